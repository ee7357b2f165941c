//! 도메인 필터 -- 규칙 엔진 위에 구현된 구체 필터들
//!
//! # 제공 필터
//! - [`build`]: Maven 빌드 출력 상태 머신 (세션 상태 + 보일러플레이트 접기)
//! - [`leveled`]: 레벨 로그 문법 필터 (log4j 계열) 및 Hibernate/Spring 소음 제거
//! - [`svn`]: svn update 출력 필터
//! - [`PrefixFilter`]: 모든 라인 앞에 회색 태그를 붙이는 단순 필터
//!
//! 각 필터 인스턴스는 자신의 규칙 집합과 세션 상태를 단독으로 소유합니다.
//! 스트림 하나당 인스턴스 하나를 만드세요.

pub mod build;
pub mod leveled;
pub mod svn;

pub use build::{BuildSession, build_output_filter};
pub use leveled::{
    LevelHandler, LevelRule, LeveledContext, LeveledRecord, hibernate_spring_filter,
    leveled_log_filter,
};
pub use svn::svn_update_filter;

use logsift_core::colour::{GRAY, NONE};

use crate::engine::{LineFilter, Verdict};
use crate::error::FilterError;

/// 모든 라인 앞에 회색 접두 태그를 붙이는 필터
///
/// 여러 자식 프로세스의 출력을 하나의 터미널로 섞을 때 출처를
/// 표시하는 용도입니다.
pub struct PrefixFilter {
    prefix: String,
}

impl PrefixFilter {
    /// 접두 태그로 필터를 생성합니다.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl LineFilter for PrefixFilter {
    fn filter_line(&mut self, line: &str) -> Result<Verdict, FilterError> {
        Ok(Verdict::Emit(format!(
            "{GRAY}{}: {NONE}{line}",
            self.prefix
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_core::colour::remove_colours;

    #[test]
    fn prefix_is_prepended_to_every_line() {
        let mut filter = PrefixFilter::new("agent-1");
        let Verdict::Emit(out) = filter.filter_line("hello").unwrap() else {
            panic!("prefix filter always emits");
        };
        assert_eq!(remove_colours(&out), "agent-1: hello");
    }
}
