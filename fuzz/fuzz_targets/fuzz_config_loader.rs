#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // TOML parsing of Config must never panic; parse and validation errors are fine.
    match balance_config::load_toml(data) {
        Ok(cfg) => {
            let _ = cfg.validate();
        }
        Err(_e) => {}
    }
});
