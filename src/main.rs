mod chart;
mod config;
mod format;
mod logging;
mod readings;
mod theme;
mod ui;

use crate::config::{settings_path, Settings, YamlThemeStore};
use crate::readings::{DashboardState, SharedDashboardState};
use crate::theme::{ThemeController, ThemeMode};
use log::Level::{Error, Info};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use tokio::sync::Mutex;
use winit::event_loop::EventLoopBuilder;

fn main() -> ExitCode {
    logging::init_logging();

    let path = settings_path();
    let settings = match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            config_log!(Error, "Ignoring unreadable settings: {}", e);
            Settings::default()
        }
    };

    let mut theme = ThemeController::with_store(Box::new(YamlThemeStore::new(&path)));
    theme.subscribe(Box::new(|mode, _palette| {
        theme_log!(Info, "Switched to {:?} theme", mode);
    }));

    let state = match DashboardState::new(theme, settings.step_goal) {
        Ok(state) => Arc::new(Mutex::new(state)),
        Err(e) => {
            ui_log!(Error, "Invalid dashboard data: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Background work runs on the runtime; the UI keeps the main thread
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            readings_log!(Error, "Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(readings::maybe_start_mock_readings(state.clone()));

    start_command_listener(state.clone(), settings.command_port);

    let event_loop = EventLoopBuilder::<ui::UiEvent>::with_user_event().build();
    if let Err(e) = ui::run_ui(event_loop, state) {
        ui_log!(Error, "UI failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn start_command_listener(state: SharedDashboardState, port: u16) {
    thread::spawn(move || {
        let listener = match TcpListener::bind(("127.0.0.1", port)) {
            Ok(listener) => listener,
            Err(e) => {
                theme_log!(Error, "Failed to bind command listener on port {}: {}", port, e);
                return;
            }
        };
        theme_log!(Info, "Listening for commands on 127.0.0.1:{}", port);
        for stream in listener.incoming().flatten() {
            handle_command(stream, &state);
        }
    });
}

fn handle_command(mut stream: TcpStream, state: &SharedDashboardState) {
    let reader = match stream.try_clone() {
        Ok(read_half) => BufReader::new(read_half),
        Err(_) => return,
    };
    if let Some(Ok(line)) = reader.lines().next() {
        let response = {
            let mut state = state.blocking_lock();
            execute_command(&mut state.theme, &line)
        };
        let _ = stream.write_all(response.as_bytes());
    }
}

/// Apply one line command to the theme and produce the reply line.
fn execute_command(theme: &mut ThemeController, line: &str) -> String {
    let tokens: Vec<_> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["set_scheme", scheme] => match scheme.parse::<ThemeMode>() {
            Ok(mode) => {
                theme.set_mode(mode);
                "OK\n".to_string()
            }
            Err(e) => format!("ERR {}\n", e),
        },
        ["toggle_scheme"] => format!("OK {:?}\n", theme.toggle_mode()),
        ["get_scheme"] => format!("OK {:?}\n", theme.mode()),
        ["get_color", role] => match theme.palette().lookup(role) {
            Ok(color) => format!("OK {}\n", color.to_hex()),
            Err(e) => format!("ERR {}\n", e),
        },
        ["get_palette"] => {
            let colors: Vec<String> = theme
                .palette()
                .iter()
                .map(|(role, color)| format!("{}={}", role, color.to_hex()))
                .collect();
            format!("OK {}\n", colors.join(" "))
        }
        _ => "ERR unknown command\n".to_string(),
    }
}
