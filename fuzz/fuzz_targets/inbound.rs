#![no_main]

use libfuzzer_sys::fuzz_target;
use unionpay::FieldList;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = std::str::from_utf8(data) {
        if let Ok(fields) = FieldList::parse_response_body(body) {
            let _ = fields.canonical_string();
        }
    }
    let _ = FieldList::from_form_urlencoded(data);
});
