//! 에러 타입 — 도메인별 에러 정의

/// Logsift 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스트림 처리 에러
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 스트림 처리 에러
///
/// 라인 펌프가 스트림 처리를 중단해야 하는 상황을 표현합니다.
/// 필터 크레이트의 도메인 에러가 이 타입으로 변환되어 상위로 전파됩니다.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// 치명적 중단 트리거 (빌드 실패 fast-quit, 인증 실패 등)
    #[error("stream aborted: {reason}: {line}")]
    Aborted { reason: String, line: String },

    /// 규칙 구성 에러 (잘못된 패턴 등)
    #[error("rule error: {0}")]
    Rule(String),

    /// 핸들러 실행 중 에러
    #[error("handler error: {0}")]
    Handler(String),
}
