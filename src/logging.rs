use log::{info, LevelFilter};
use std::env;

pub const UI_NAMESPACE: &str = "pulse::ui";
pub const THEME_NAMESPACE: &str = "pulse::theme";
pub const READINGS_NAMESPACE: &str = "pulse::readings";
pub const CONFIG_NAMESPACE: &str = "pulse::config";

pub fn init_logging() {
    // Default to info unless the environment says otherwise
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "info");
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp_millis()
        .format_module_path(true)
        .format_target(true)
        .filter(Some(UI_NAMESPACE), LevelFilter::Debug)
        .filter(Some(THEME_NAMESPACE), LevelFilter::Debug)
        .filter(Some(READINGS_NAMESPACE), LevelFilter::Debug)
        .filter(Some(CONFIG_NAMESPACE), LevelFilter::Debug)
        .init();

    info!("Logging initialized");
}

#[macro_export]
macro_rules! ui_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::UI_NAMESPACE, $($arg)*)
    };
}

#[macro_export]
macro_rules! theme_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::THEME_NAMESPACE, $($arg)*)
    };
}

#[macro_export]
macro_rules! readings_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::READINGS_NAMESPACE, $($arg)*)
    };
}

#[macro_export]
macro_rules! config_log {
    ($($arg:tt)*) => {
        log::log!(target: $crate::logging::CONFIG_NAMESPACE, $($arg)*)
    };
}
