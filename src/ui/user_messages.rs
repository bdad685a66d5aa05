use dialoguer::console::style;
use std::fmt::Display;
use tracing::info;

pub(crate) fn print_invalid_input(message: &str) {
    info!(target: "plain", "{} {}", style("✘").yellow(), message);
}

pub(crate) fn print_not_found(ids: &[String]) {
    info!(target: "plain",
        "{} Coin IDs not found in the current data: {}",
        style("✘").yellow(),
        style(ids.join(", ")).bold(),
    );
}

pub(crate) fn print_fetch_error(coin_id: &str, error: impl Display) {
    info!(target: "plain",
        "{} Error fetching data for {}: {}",
        style("✘").red(),
        style(coin_id).bold(),
        style(error).red(),
    );
}

pub(crate) fn print_processing_error(coin_id: &str, error: impl Display) {
    info!(target: "plain",
        "{} Error processing data for {}: {}",
        style("✘").red(),
        style(coin_id).bold(),
        style(error).red(),
    );
}

pub(crate) fn print_chart_error(error: impl Display) {
    info!(target: "plain",
        "{} Could not display chart: {}",
        style("✘").red(),
        style(error).red(),
    );
}

pub(crate) fn print_catalog_loaded(count: usize) {
    info!(target: "plain",
        "{} {} {}",
        style("✔").green(),
        style("Market data loaded").bold(),
        style(format!("· {count} coins")).dim(),
    );
}

pub(crate) fn print_exit() {
    info!(target: "plain", "{}", style("Exiting the session.").dim());
}
