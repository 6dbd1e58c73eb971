#![no_main]
use draper_rs::{Cipher, Config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let cipher = Cipher::new(&Config::new().spin(1).length(8).unwrap()).unwrap();
    let input = String::from_utf8_lossy(data);
    if let Ok(value) = cipher.decode(&input) {
        assert_eq!(cipher.encode(value).as_deref(), Ok(&*input));
    }
});
