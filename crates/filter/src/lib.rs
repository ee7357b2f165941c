#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`rule`]: 규칙 타입 (Action/Template/Literal)과 규칙 집합
//! - [`engine`]: 라인 하나에 대한 규칙 디스패치 ([`engine::filter_line`])
//! - [`pump`]: 소스 -> 필터 -> 싱크 라인 펌프 (선택적 tee/컬러 제거)
//! - [`filters`]: 도메인 필터 (Maven 빌드, 레벨 로그, svn, 접두 태그)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LineSource -> LinePump -> LineFilter(RuleSet + 세션 상태) -> LineSink
//!                  |
//!               tee 싱크 (원시 입력 CRLF 복사)
//! ```
//!
//! 처리 모델은 단일 스레드 동기 pull 방식입니다. 블로킹 지점은 소스
//! 읽기 하나뿐이고, 출력은 라인마다 즉시 플러시됩니다. 규칙 집합과
//! 세션 상태는 스트림(펌프 실행) 하나당 인스턴스 하나씩 소유합니다.

pub mod engine;
pub mod error;
pub mod filters;
pub mod pump;
pub mod rule;

// --- 주요 타입 re-export ---

// 엔진
pub use engine::{LineFilter, RuleFilter, Verdict, filter_line};

// 규칙
pub use rule::{HandlerOutput, Rule, RuleSet};

// 펌프
pub use pump::{LinePump, LineSink, LineSource, ReaderSource, WriterSink};

// 에러
pub use error::FilterError;

// 도메인 필터
pub use filters::{
    PrefixFilter, build_output_filter, hibernate_spring_filter, leveled_log_filter,
    svn_update_filter,
};
