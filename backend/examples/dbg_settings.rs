//! Temporary diagnostic for settings loading.
use std::ffi::OsString;
use harvestworld::server::ServerSettings;
use ortho_config::OrthoConfig;

fn main() {
    let s = ServerSettings::load_from_iter([OsString::from("harvestworld")]).unwrap();
    println!("{s:?}");
}
