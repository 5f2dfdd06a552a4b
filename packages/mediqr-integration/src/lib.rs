mod common;
mod qr_lookup;
