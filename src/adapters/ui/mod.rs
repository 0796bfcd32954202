pub mod banner;
pub mod cli;
pub mod progress;

/// Prints the welcome banner and applies the theme for all subsequent inquire prompts.
/// Call once at startup (e.g. in main after tracing init).
pub fn init_ui() {
    banner::print_welcome();
    cli::apply_theme();
}
