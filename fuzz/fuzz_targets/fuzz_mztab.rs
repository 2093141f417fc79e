#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use quantmsio::ingest::PsmReader;
use quantmsio::metadata::IdentificationMetadata;

fuzz_target!(|data: &[u8]| {
    // Header parsing must fail gracefully on any input
    let Ok(metadata) = IdentificationMetadata::from_mztab_reader(Cursor::new(data)) else {
        return;
    };

    // Read up to 1000 rows; every row is either a record or an error
    let reader = PsmReader::from_reader(Cursor::new(data), &metadata, "fuzz.mzTab");
    for _ in reader.take(1000) {}
});
