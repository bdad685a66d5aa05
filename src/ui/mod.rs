pub(crate) mod io_input;
pub(crate) mod spinner;
pub(crate) mod user_messages;
