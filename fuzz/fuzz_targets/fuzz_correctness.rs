#![no_main]

use libfuzzer_sys::fuzz_target;
use stream_merge::comparators::{ByOrd, MaxFirst};

fuzz_target!(|data: Vec<Vec<i8>>| {
    stream_merge::tests::order::assert_correct_order(&data, ByOrd);
    stream_merge::tests::order::assert_correct_order(&data, MaxFirst::new(ByOrd));
});
