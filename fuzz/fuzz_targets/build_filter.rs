//! Maven 빌드 필터 퍼징 -- 임의 입력 라인에 대해 패닉이 없어야 합니다.
//! 치명적 트리거는 Err로 반환될 수 있지만 그 외에는 항상 판정이 나와야 합니다.

#![no_main]

use libfuzzer_sys::fuzz_target;

use logsift_filter::engine::LineFilter;
use logsift_filter::filters::build_output_filter;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let mut filter = build_output_filter().expect("filter construction must not fail");
    for line in line.lines() {
        let _ = filter.filter_line(line);
    }
});
