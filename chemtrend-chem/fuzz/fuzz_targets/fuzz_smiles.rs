#![no_main]
use chemtrend_chem::FingerprintSource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(mol) = chemtrend_chem::parse_smiles(data) {
        let _ = chemtrend_chem::path_fingerprint(&mol, 7, 1024);
    }
    let _ = chemtrend_chem::MorganSource::default().fingerprint(data);
});
