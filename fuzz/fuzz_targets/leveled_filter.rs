//! 레벨 로그 필터 퍼징 -- 구조 패턴에 맞든 아니든 패닉이 없어야 합니다.

#![no_main]

use libfuzzer_sys::fuzz_target;

use logsift_filter::engine::LineFilter;
use logsift_filter::filters::hibernate_spring_filter;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut filter = hibernate_spring_filter().expect("filter construction must not fail");
    for line in text.lines() {
        let _ = filter.filter_line(line);
    }
});
