//! 필터 에러 타입
//!
//! [`FilterError`]는 규칙 구성, 핸들러 실행, 라인 펌프에서 발생하는
//! 모든 에러를 표현합니다. `From<FilterError> for SiftError` 변환이
//! 구현되어 있어 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logsift_core::error::{SiftError, StreamError};

/// 라인 필터링 도메인 에러
///
/// 구성 에러(잘못된 패턴)는 규칙 생성 시점에 즉시 발생하며,
/// 치명적 중단 트리거(fast-quit, 인증 실패)는 라인 처리 중
/// 펌프 전체를 중단시킵니다.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// 정규식 컴파일 실패 (규칙 생성 시점에 검출)
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// 문제가 된 패턴 문자열
        pattern: String,
        /// regex 크레이트의 원본 에러
        #[source]
        source: regex::Error,
    },

    /// 빌드 fast-quit 마커 -- 업스트림 빌드가 복구 불가능하게 죽음
    #[error("build failed, quitting: {line}")]
    BuildAborted {
        /// 트리거가 된 입력 라인
        line: String,
    },

    /// 인증 실패 마커
    #[error("authentication failure detected: {line}")]
    AuthFailure {
        /// 트리거가 된 입력 라인
        line: String,
    },

    /// 핸들러 실행 중 에러
    #[error("handler error: {reason}")]
    Handler {
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러 (소스 읽기, 싱크/tee 쓰기)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FilterError> for SiftError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::Pattern { pattern, source } => {
                SiftError::Stream(StreamError::Rule(format!("invalid pattern '{pattern}': {source}")))
            }
            FilterError::BuildAborted { line } => SiftError::Stream(StreamError::Aborted {
                reason: "build failed".to_owned(),
                line,
            }),
            FilterError::AuthFailure { line } => SiftError::Stream(StreamError::Aborted {
                reason: "authentication failure".to_owned(),
                line,
            }),
            FilterError::Handler { reason } => SiftError::Stream(StreamError::Handler(reason)),
            FilterError::Io(e) => SiftError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_convert_to_aborted_stream() {
        let err = FilterError::BuildAborted {
            line: "mvnw: OSError".to_owned(),
        };
        let sift: SiftError = err.into();
        assert!(matches!(
            sift,
            SiftError::Stream(StreamError::Aborted { .. })
        ));
    }

    #[test]
    fn pattern_error_converts_to_rule_stream_error() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = FilterError::Pattern {
            pattern: "(".to_owned(),
            source,
        };
        let sift: SiftError = err.into();
        assert!(matches!(sift, SiftError::Stream(StreamError::Rule(_))));
    }
}
