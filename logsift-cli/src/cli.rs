//! CLI 인자 정의

use clap::{Parser, Subcommand};

/// Logsift — stdin 라인 스트림 필터링 도구
///
/// 빌드 도구/로그 출력물을 파이프로 받아 소음을 접고 중요한 라인만
/// 간결하게 보여줍니다. 예: `mvn install | logsift maven`
#[derive(Parser)]
#[command(name = "logsift", version, about)]
pub struct Cli {
    /// 설정 파일 경로
    #[arg(short, long, default_value = "logsift.toml")]
    pub config: String,

    /// 원시 입력을 복사할 tee 로그 파일
    #[arg(short, long)]
    pub log_file: Option<String>,

    /// 출력에서 ANSI 컬러 코드 제거
    #[arg(long)]
    pub no_colour: bool,

    /// 로그 레벨 (tracing env-filter 문법)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// 사용할 필터 (생략하면 설정 파일의 filter 값)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// 필터 선택
#[derive(Subcommand)]
pub enum Command {
    /// Maven 빌드 출력 필터 (보일러플레이트 접기 + 실패 모듈 강조)
    Maven,
    /// 레벨 로그(log4j 계열) 기본 필터
    Java,
    /// 레벨 로그 필터 + Hibernate/Spring 소음 제거
    Hibernate,
    /// svn update 출력 필터
    Svn,
    /// 모든 라인에 회색 접두 태그를 붙이는 필터
    Prefix {
        /// 접두 태그
        tag: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_subcommand() {
        let cli = Cli::parse_from(["logsift", "maven"]);
        assert!(matches!(cli.command, Some(Command::Maven)));
    }

    #[test]
    fn prefix_takes_a_tag() {
        let cli = Cli::parse_from(["logsift", "prefix", "agent-1"]);
        let Some(Command::Prefix { tag }) = cli.command else {
            panic!("expected prefix command");
        };
        assert_eq!(tag, "agent-1");
    }

    #[test]
    fn flags_have_defaults() {
        let cli = Cli::parse_from(["logsift"]);
        assert_eq!(cli.config, "logsift.toml");
        assert!(!cli.no_colour);
        assert!(cli.log_file.is_none());
    }
}
