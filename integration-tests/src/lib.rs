/// One-shot HTTP server standing in for the osu! API.
pub mod stub;
