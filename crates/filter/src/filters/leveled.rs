//! 레벨 로그 필터 -- `timestamp level class:line - message` 문법
//!
//! log4j 계열의 구조화된 로그 라인을 두 단계로 처리합니다.
//!
//! - A 단계: 고정 구조 패턴으로 라인을 5개 필드로 분해합니다. 구조에
//!   맞지 않는 라인은 레벨 로그가 아니므로 체인을 그대로 통과합니다.
//!   (분해 자체가 바깥 체인의 Action 규칙 하나로 구현됩니다.)
//! - B 단계: 분해된 레코드에 대해 레벨 규칙을 등록 순서로 스캔하고,
//!   아무것도 매칭되지 않으면 레벨별 기본 렌더러가 실행됩니다.
//!
//! 두 단계 모두 라인 간 상태가 없는 순수 분해입니다. 프레임워크 소음
//! 필터(Hibernate/Spring)는 억제 레벨 규칙을 기본 렌더러보다 앞에
//! 등록하는 방식으로 구성됩니다.

use regex::{Captures, Regex};

use logsift_core::colour::{BROWN, GRAY, NONE, PURPLE, RED, WHITE};

use crate::engine::RuleFilter;
use crate::error::FilterError;
use crate::rule::{HandlerOutput, RuleSet, compile_anchored};

/// 레벨 로그 구조 패턴: `timestamp level class:line - message`
const STRUCTURE_PATTERN: &str =
    r"^(\d+-\d+-\d+\s+\d+:\d+:\d+,\d+)\s+(\w+)\s+(\w+):(\d+)\s-\s(.*)$";

/// 한 라인에서 분해된 레벨 로그 레코드
///
/// 한 라인의 처리 동안만 유효한 임시 값입니다. 규칙 객체에
/// 저장되지 않고 핸들러 인자로만 전달됩니다.
#[derive(Debug, Clone, Copy)]
pub struct LeveledRecord<'a> {
    /// 타임스탬프 텍스트
    pub timestamp: &'a str,
    /// 로그 레벨 (INFO, WARN, ...)
    pub level: &'a str,
    /// 클래스 이름
    pub class_name: &'a str,
    /// 클래스 내 라인 번호 (텍스트 그대로)
    pub line_number: &'a str,
    /// 메시지 본문
    pub message: &'a str,
}

/// 레벨 규칙 핸들러 시그니처
///
/// 분해된 레코드와 메시지 패턴의 캡처를 받습니다.
pub type LevelHandler =
    Box<dyn Fn(&LeveledRecord<'_>, &Captures<'_>) -> Result<HandlerOutput, FilterError> + Send>;

/// 레벨 규칙 -- (레벨, 클래스, 라인 번호, 메시지 패턴) 조합 매칭
///
/// 지정하지 않은 필드는 무엇에든 매칭됩니다. 모든 지정 필드가
/// 레코드와 같고 메시지 패턴이 메시지에 매칭될 때만 실행됩니다.
pub struct LevelRule {
    level: Option<String>,
    class_name: Option<String>,
    line_number: Option<String>,
    message_pattern: Regex,
    handler: LevelHandler,
}

impl LevelRule {
    /// 레코드가 이 규칙에 매칭되면 메시지 캡처를 반환합니다.
    fn matches<'a>(&self, record: &LeveledRecord<'a>) -> Option<Captures<'a>> {
        if let Some(ref level) = self.level {
            if level != record.level {
                return None;
            }
        }
        if let Some(ref class_name) = self.class_name {
            if class_name != record.class_name {
                return None;
            }
        }
        if let Some(ref line_number) = self.line_number {
            if line_number != record.line_number {
                return None;
            }
        }
        self.message_pattern.captures(record.message)
    }
}

/// 레벨 규칙 테이블 -- 레벨 로그 필터의 스트림별 컨텍스트
#[derive(Default)]
pub struct LeveledContext {
    level_rules: Vec<LevelRule>,
}

impl LeveledContext {
    /// 빈 테이블을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 레벨 규칙을 등록합니다. 먼저 등록된 규칙이 우선합니다.
    ///
    /// `message_pattern`이 `None`이면 모든 메시지에 매칭됩니다.
    pub fn add_level_rule<F>(
        &mut self,
        level: Option<&str>,
        class_name: Option<&str>,
        line_number: Option<&str>,
        message_pattern: Option<&str>,
        handler: F,
    ) -> Result<(), FilterError>
    where
        F: Fn(&LeveledRecord<'_>, &Captures<'_>) -> Result<HandlerOutput, FilterError>
            + Send
            + 'static,
    {
        self.level_rules.push(LevelRule {
            level: level.map(str::to_owned),
            class_name: class_name.map(str::to_owned),
            line_number: line_number.map(str::to_owned),
            message_pattern: compile_anchored(message_pattern)?,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// 해당 조합의 라인을 억제하는 레벨 규칙을 등록합니다.
    pub fn suppress(
        &mut self,
        level: Option<&str>,
        class_name: Option<&str>,
        line_number: Option<&str>,
    ) -> Result<(), FilterError> {
        self.add_level_rule(level, class_name, line_number, None, |_, _| {
            Ok(HandlerOutput::Suppress)
        })
    }

    /// 등록된 레벨 규칙 수
    pub fn rule_count(&self) -> usize {
        self.level_rules.len()
    }

    /// 레코드를 렌더링합니다: 첫 매칭 레벨 규칙, 없으면 레벨별 기본 렌더러.
    fn render(&self, record: &LeveledRecord<'_>) -> Result<HandlerOutput, FilterError> {
        for rule in &self.level_rules {
            if let Some(caps) = rule.matches(record) {
                return (rule.handler)(record, &caps);
            }
        }
        Ok(render_default(record))
    }
}

/// 레벨별 기본 렌더링: 한 줄짜리 `class:line message` 요약
fn render_default(record: &LeveledRecord<'_>) -> HandlerOutput {
    let LeveledRecord {
        level,
        class_name,
        line_number,
        message,
        ..
    } = record;

    let rendered = match *level {
        "INFO" => format!("I {BROWN}{class_name}:{line_number} {GRAY}{message}{NONE}"),
        "WARN" => format!("W {BROWN}{class_name}:{line_number} {WHITE}{message}{NONE}"),
        "ERROR" => format!("E {BROWN}{class_name}:{line_number} {PURPLE}{message}{NONE}"),
        "FATAL" => format!("F {BROWN}{class_name}:{line_number} {RED}{message}{NONE}"),
        _ => format!("u {class_name}:{line_number} {message}{NONE}"),
    };
    HandlerOutput::Line(rendered)
}

/// 범용 레벨 로그 필터를 생성합니다.
///
/// 구조 분해 규칙 하나만 체인에 등록된 상태로 시작합니다. 레벨 규칙은
/// [`RuleFilter::context_mut`]를 통해 추가하세요.
pub fn leveled_log_filter() -> Result<RuleFilter<LeveledContext>, FilterError> {
    let mut set = RuleSet::new();

    set.add_chained_action(
        Some(STRUCTURE_PATTERN),
        |_line, caps, ctx: &mut LeveledContext| {
            let record = LeveledRecord {
                timestamp: caps.get(1).map_or("", |m| m.as_str()),
                level: caps.get(2).map_or("", |m| m.as_str()),
                class_name: caps.get(3).map_or("", |m| m.as_str()),
                line_number: caps.get(4).map_or("", |m| m.as_str()),
                message: caps.get(5).map_or("", |m| m.as_str()),
            };
            ctx.render(&record)
        },
    )?;

    Ok(RuleFilter::new(set, LeveledContext::new()))
}

/// Hibernate/Spring 소음을 걸러내는 레벨 로그 필터를 생성합니다.
///
/// 알려진 (레벨, 클래스, 라인 번호) 조합의 프레임워크 로그를 억제하고
/// 나머지는 모두 그대로 보이게 둡니다.
pub fn hibernate_spring_filter() -> Result<RuleFilter<LeveledContext>, FilterError> {
    let mut filter = leveled_log_filter()?;

    // Hibernate가 stdout에 직접 찍는 SQL 덤프
    filter
        .rule_set_mut()
        .add_chained_template(Some(r"^Hibernate: (.*)$"), None)?;

    let ctx = filter.context_mut();

    // Hibernate 기동 소음
    ctx.suppress(Some("INFO"), Some("XmlBeanDefinitionReader"), Some("323"))?;
    ctx.suppress(Some("INFO"), Some("SettingsFactory"), None)?;
    ctx.suppress(Some("INFO"), Some("ASTQueryTranslatorFactory"), Some("24"))?;
    ctx.suppress(
        Some("INFO"),
        Some("MappingFilePersistenceUnitPostProcessor"),
        Some("121"),
    )?;
    ctx.suppress(
        Some("INFO"),
        Some("MappingFilePersistenceUnitPostProcessor"),
        Some("150"),
    )?;
    ctx.suppress(
        Some("INFO"),
        Some("MappingFilePersistenceUnitPostProcessor"),
        Some("208"),
    )?;
    ctx.suppress(Some("INFO"), Some("Dialect"), Some("152"))?;
    ctx.suppress(Some("INFO"), Some("MergablePersistenceUnitManager"), Some("91"))?;
    ctx.suppress(Some("INFO"), Some("MergablePersistenceUnitManager"), Some("104"))?;
    ctx.suppress(Some("INFO"), Some("Configuration"), Some("559"))?;
    ctx.suppress(Some("INFO"), Some("AnnotationBinder"), Some("418"))?;
    ctx.suppress(Some("INFO"), Some("AnnotationBinder"), Some("969"))?;
    ctx.suppress(Some("INFO"), Some("EntityBinder"), Some("424"))?;
    ctx.suppress(Some("INFO"), Some("QueryBinder"), Some("64"))?;
    ctx.suppress(Some("INFO"), Some("CollectionBinder"), Some("651"))?;

    // Spring 기동 소음
    ctx.suppress(Some("INFO"), Some("DefaultListableBeanFactory"), Some("467"))?;
    ctx.suppress(Some("INFO"), Some("DefaultListableBeanFactory"), Some("414"))?;
    ctx.suppress(Some("INFO"), Some("DefaultListableBeanFactory"), Some("421"))?;
    ctx.suppress(Some("INFO"), Some("GenericApplicationContext"), Some("1196"))?;

    tracing::debug!(
        level_rules = filter.context().rule_count(),
        "hibernate/spring filter constructed"
    );
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{LineFilter, Verdict};

    const SAMPLE: &str = "2016-01-01 10:00:00,000 INFO MyClass:42 - started";

    #[test]
    fn info_default_rendering() {
        let mut filter = leveled_log_filter().unwrap();
        let verdict = filter.filter_line(SAMPLE).unwrap();

        let Verdict::Emit(out) = verdict else {
            panic!("expected emitted line, got {verdict:?}");
        };
        assert!(out.starts_with("I "));
        assert!(out.contains("MyClass:42"));
        assert!(out.contains("started"));
    }

    #[test]
    fn each_level_gets_its_own_prefix() {
        let mut filter = leveled_log_filter().unwrap();
        for (level, prefix) in [
            ("INFO", "I "),
            ("WARN", "W "),
            ("ERROR", "E "),
            ("FATAL", "F "),
            ("TRACE", "u "),
        ] {
            let line = format!("2016-01-01 10:00:00,000 {level} MyClass:42 - msg");
            let Verdict::Emit(out) = filter.filter_line(&line).unwrap() else {
                panic!("expected emitted line for level {level}");
            };
            assert!(out.starts_with(prefix), "level {level}: got {out:?}");
        }
    }

    #[test]
    fn non_structural_line_passes_through() {
        let mut filter = leveled_log_filter().unwrap();
        let verdict = filter.filter_line("just some stdout noise").unwrap();
        assert_eq!(verdict, Verdict::Emit("just some stdout noise".to_owned()));
    }

    #[test]
    fn first_matching_level_rule_wins() {
        let mut filter = leveled_log_filter().unwrap();
        filter
            .context_mut()
            .add_level_rule(Some("INFO"), None, None, None, |_, _| {
                Ok(HandlerOutput::Line("first".to_owned()))
            })
            .unwrap();
        filter
            .context_mut()
            .add_level_rule(Some("INFO"), None, None, None, |_, _| {
                Ok(HandlerOutput::Line("second".to_owned()))
            })
            .unwrap();

        let verdict = filter.filter_line(SAMPLE).unwrap();
        assert_eq!(verdict, Verdict::Emit("first".to_owned()));
    }

    #[test]
    fn unset_fields_match_anything() {
        let mut filter = leveled_log_filter().unwrap();
        filter
            .context_mut()
            .add_level_rule(None, Some("MyClass"), None, Some("sta(.*)$"), |record, caps| {
                Ok(HandlerOutput::Line(format!(
                    "{}:{} tail={}",
                    record.class_name, record.line_number, &caps[1]
                )))
            })
            .unwrap();

        let verdict = filter.filter_line(SAMPLE).unwrap();
        assert_eq!(verdict, Verdict::Emit("MyClass:42 tail=rted".to_owned()));
    }

    #[test]
    fn mismatched_class_falls_to_default() {
        let mut filter = leveled_log_filter().unwrap();
        filter
            .context_mut()
            .suppress(Some("INFO"), Some("OtherClass"), None)
            .unwrap();

        let Verdict::Emit(out) = filter.filter_line(SAMPLE).unwrap() else {
            panic!("expected default rendering");
        };
        assert!(out.starts_with("I "));
    }

    #[test]
    fn hibernate_noise_is_suppressed() {
        let mut filter = hibernate_spring_filter().unwrap();

        let noise = "2016-01-01 10:00:00,000 INFO SettingsFactory:99 - RDBMS: H2";
        assert_eq!(filter.filter_line(noise).unwrap(), Verdict::Suppress);

        let sql = "Hibernate: select * from users";
        assert_eq!(filter.filter_line(sql).unwrap(), Verdict::Suppress);

        // 알려지지 않은 클래스는 계속 보입니다
        let Verdict::Emit(_) = filter.filter_line(SAMPLE).unwrap() else {
            panic!("application log must stay visible");
        };
    }
}
