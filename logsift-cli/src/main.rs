//! logsift 바이너리 진입점
//!
//! stdin을 라인 소스로, stdout을 라인 싱크로 연결하고 선택된 필터로
//! 펌프를 실행합니다. 치명적 중단(fast-quit, 인증 실패)은 에러 메시지와
//! 함께 비정상 종료합니다.

use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;

use logsift_core::SiftConfig;
use logsift_filter::engine::LineFilter;
use logsift_filter::filters::{
    PrefixFilter, build_output_filter, hibernate_spring_filter, leveled_log_filter,
    svn_update_filter,
};
use logsift_filter::pump::{LinePump, ReaderSource, WriterSink};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = load_config(&cli.config)?;

    // 플래그가 설정 파일 값보다 우선합니다
    let filter_name = match &cli.command {
        Some(command) => command_name(command).to_owned(),
        None => config
            .filter
            .clone()
            .context("no filter selected: pass a subcommand or set `filter` in logsift.toml")?,
    };
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.log_file.as_ref().map(|p| p.display().to_string()));
    let strip_colours = cli.no_colour || !config.colour;

    let mut filter = build_filter(&cli, &filter_name)?;

    let mut pump = LinePump::new().with_strip_colours(strip_colours);
    if let Some(path) = log_file {
        pump = pump
            .with_tee_file(&path)
            .with_context(|| format!("failed to open tee log file: {path}"))?;
    }

    tracing::info!(filter = %filter_name, "starting line pump on stdin");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut source = ReaderSource::new(stdin.lock());
    let mut sink = WriterSink::new(stdout.lock());

    pump.run(&mut source, filter.as_mut(), &mut sink)
        .map_err(logsift_core::SiftError::from)
        .context("stream processing aborted")?;

    Ok(())
}

/// 선택된 이름으로 필터 인스턴스를 만듭니다.
fn build_filter(cli: &Cli, name: &str) -> Result<Box<dyn LineFilter>> {
    let filter: Box<dyn LineFilter> = match name {
        "maven" => Box::new(build_output_filter()?),
        "java" => Box::new(leveled_log_filter()?),
        "hibernate" => Box::new(hibernate_spring_filter()?),
        "svn" => Box::new(svn_update_filter()?),
        "prefix" => {
            let Some(Command::Prefix { tag }) = &cli.command else {
                bail!("prefix filter requires a tag: logsift prefix <TAG>");
            };
            Box::new(PrefixFilter::new(tag.clone()))
        }
        other => bail!("unknown filter: {other}"),
    };
    Ok(filter)
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Maven => "maven",
        Command::Java => "java",
        Command::Hibernate => "hibernate",
        Command::Svn => "svn",
        Command::Prefix { .. } => "prefix",
    }
}

/// 설정 파일을 로드합니다. 기본 경로가 없으면 기본값을 사용합니다.
fn load_config(path: &str) -> Result<SiftConfig> {
    if !Path::new(path).exists() {
        tracing::debug!(path, "config file not found, using defaults");
        return Ok(SiftConfig {
            colour: true,
            ..SiftConfig::default()
        });
    }
    SiftConfig::load(path)
        .map_err(logsift_core::SiftError::from)
        .with_context(|| format!("failed to load config: {path}"))
}

/// stderr로 내보내는 tracing 구독자를 초기화합니다.
fn init_tracing(log_level: &str) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("invalid log level: {log_level}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
