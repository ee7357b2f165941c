//! 라인 펌프 -- 소스에서 한 줄씩 끌어와 필터를 거쳐 싱크로 전달
//!
//! 펌프는 단일 스레드 동기 pull 방식으로 동작합니다. 블로킹 지점은
//! "소스에서 다음 라인 읽기" 하나뿐이며, 출력은 라인마다 즉시 플러시되어
//! 출력 순서가 입력 순서와 정확히 일치합니다 (live-tail 용도).
//!
//! 선택적으로 tee 싱크에 원시 입력을 CRLF 종결자로 복사하고,
//! 출력 직전에 ANSI 컬러 코드를 제거할 수 있습니다.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use logsift_core::colour;

use crate::engine::{LineFilter, Verdict};
use crate::error::FilterError;

/// 라인 소스 -- 순서대로, 중복 없이, 한 번에 한 라인씩 생산
pub trait LineSource {
    /// 다음 라인을 반환합니다. 스트림 끝이면 `Ok(None)`.
    ///
    /// 반환된 라인에는 종결자(`\n`/`\r\n`/`\r`)가 남아 있을 수 있으며,
    /// 펌프가 매칭 전에 제거합니다.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// 라인 싱크 -- 문자열 시퀀스를 순서대로 수용
pub trait LineSink {
    /// 라인 하나를 기록합니다 (종결자 없이 전달됨).
    fn write_line(&mut self, line: &str) -> io::Result<()>;
    /// 버퍼를 비웁니다.
    fn flush(&mut self) -> io::Result<()>;
}

/// `BufRead` 기반 라인 소스
pub struct ReaderSource<R: BufRead> {
    inner: R,
}

impl<R: BufRead> ReaderSource<R> {
    /// 버퍼 리더를 감싸 라인 소스를 만듭니다.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.inner.read_line(&mut buf)?;
        if n == 0 { Ok(None) } else { Ok(Some(buf)) }
    }
}

/// `Write` 기반 라인 싱크 (라인마다 `\n` 종결)
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    /// 라이터를 감싸 라인 싱크를 만듭니다.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.inner, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// 테스트용 버퍼 싱크
impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_owned());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 라인 종결자를 제거합니다. `\r\n`, `\n`, `\r` 순으로 하나만 벗깁니다.
pub fn strip_line_terminator(line: &str) -> &str {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        return stripped;
    }
    if let Some(stripped) = line.strip_suffix('\n') {
        return stripped;
    }
    line.strip_suffix('\r').unwrap_or(line)
}

/// 라인 펌프
///
/// 스트림 하나당 펌프 하나를 사용하세요. 필터 인스턴스(규칙 집합과
/// 세션 상태 포함)도 스트림 간에 공유하면 안 됩니다.
pub struct LinePump {
    tee: Option<Box<dyn Write>>,
    strip_colours: bool,
}

impl LinePump {
    /// tee 없이, 컬러를 그대로 두는 펌프를 생성합니다.
    pub fn new() -> Self {
        Self {
            tee: None,
            strip_colours: false,
        }
    }

    /// 원시 입력을 복사할 tee 싱크를 설정합니다.
    ///
    /// 각 라인은 필터링 전에 CRLF 종결자와 함께 기록됩니다.
    pub fn with_tee(mut self, tee: impl Write + 'static) -> Self {
        self.tee = Some(Box::new(tee));
        self
    }

    /// 경로의 파일을 열어 tee 싱크로 설정합니다.
    pub fn with_tee_file(self, path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(self.with_tee(BufWriter::new(file)))
    }

    /// 출력 직전에 ANSI 컬러 코드를 제거할지 설정합니다.
    pub fn with_strip_colours(mut self, strip: bool) -> Self {
        self.strip_colours = strip;
        self
    }

    /// 소스가 소진될 때까지 라인을 펌핑합니다.
    ///
    /// 스트림 끝이 유일한 정상 종료입니다. 필터가 치명적 에러를
    /// 반환하면 즉시 되감기하며, 이미 출력된 라인은 플러시된 상태입니다.
    pub fn run(
        &mut self,
        source: &mut dyn LineSource,
        filter: &mut dyn LineFilter,
        sink: &mut dyn LineSink,
    ) -> Result<(), FilterError> {
        tracing::debug!("line pump started");
        let mut seen = 0u64;
        let mut emitted = 0u64;

        while let Some(raw) = source.next_line()? {
            let line = strip_line_terminator(&raw);
            seen += 1;

            if let Some(tee) = self.tee.as_mut() {
                write!(tee, "{line}\r\n")?;
            }

            match filter.filter_line(line) {
                Ok(Verdict::Suppress) => {}
                Ok(Verdict::Emit(out)) => {
                    if self.emit(sink, &out)? {
                        emitted += 1;
                    }
                }
                Ok(Verdict::EmitMany(lines)) => {
                    if self.emit(sink, &lines.join("\n"))? {
                        emitted += 1;
                    }
                }
                Err(err) => {
                    // 치명적 중단: 남은 라인을 처리하지 않고 즉시 전파합니다
                    tracing::warn!(line, error = %err, "stream aborted by filter");
                    self.flush_tee()?;
                    return Err(err);
                }
            }
        }

        self.flush_tee()?;
        tracing::debug!(seen, emitted, "line pump finished");
        Ok(())
    }

    /// 공백뿐인 출력은 버리고, 나머지를 싱크에 쓰고 즉시 플러시합니다.
    fn emit(&self, sink: &mut dyn LineSink, out: &str) -> Result<bool, FilterError> {
        if out.trim().is_empty() {
            return Ok(false);
        }

        if self.strip_colours {
            sink.write_line(&colour::remove_colours(out))?;
        } else {
            sink.write_line(out)?;
        }
        sink.flush()?;
        Ok(true)
    }

    fn flush_tee(&mut self) -> Result<(), FilterError> {
        if let Some(tee) = self.tee.as_mut() {
            tee.flush()?;
        }
        Ok(())
    }
}

impl Default for LinePump {
    fn default() -> Self {
        Self::new()
    }
}
