//! 규칙 엔진 -- 라인 하나에 대한 규칙 디스패치
//!
//! [`apply`]는 규칙 하나를 라인에 적용하고, [`filter_line`]은 규칙 집합
//! 전체를 평가합니다. terminal 규칙은 첫 매칭이 승리하여 그 라인의 처리를
//! 끝내고, chained 규칙은 순서대로 이전 출력을 이어받아 변환합니다.
//!
//! 엔진은 라인을 버퍼링하거나 재정렬하지 않으며, 라인 경계를 넘는
//! 상태는 컨텍스트(`C`)를 통해서만 전달됩니다.

use crate::error::FilterError;
use crate::rule::{HandlerOutput, Rule, RuleSet};

/// 한 라인에 대한 최종 판정
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// 단일 라인 출력
    Emit(String),
    /// 여러 라인 출력
    EmitMany(Vec<String>),
    /// 출력 없음
    Suppress,
}

/// 규칙 하나를 라인에 적용합니다.
///
/// 매칭되지 않으면 `Ok(None)`, 매칭되어 실행되었으면 핸들러/치환 결과를
/// `Ok(Some(..))`로 반환합니다. 핸들러 에러는 그대로 전파됩니다.
pub fn apply<C>(
    rule: &Rule<C>,
    line: &str,
    ctx: &mut C,
) -> Result<Option<HandlerOutput>, FilterError> {
    match rule {
        Rule::Action { pattern, handler } => match pattern.captures(line) {
            Some(caps) => Ok(Some(handler(line, &caps, ctx)?)),
            None => Ok(None),
        },
        Rule::Template { pattern, template } => {
            let Some(caps) = pattern.captures(line) else {
                return Ok(None);
            };
            let output = match template.as_deref() {
                None | Some("") => HandlerOutput::Suppress,
                Some(t) => {
                    // 출력은 템플릿 자체입니다. 매칭 구간 치환이 아니라
                    // 캡처를 템플릿에 전개합니다.
                    let mut out = String::new();
                    caps.expand(t, &mut out);
                    HandlerOutput::Line(out)
                }
            };
            Ok(Some(output))
        }
        Rule::Literal {
            needle,
            replacement,
        } => {
            if !line.contains(needle.as_str()) {
                return Ok(None);
            }
            Ok(Some(HandlerOutput::Line(
                line.replace(needle.as_str(), replacement),
            )))
        }
    }
}

/// 규칙 집합 전체를 한 라인에 대해 평가합니다.
///
/// 1. terminal 규칙을 순서대로 평가. 첫 매칭의 출력이 라인의 전체 결과이며,
///    이후 어떤 규칙도 (terminal/chained 모두) 실행되지 않습니다.
/// 2. 매칭이 없으면 chained 규칙을 순서대로 `current`에 접어 나갑니다.
///    억제는 체인 중간에서 빈 문자열이 되어 이후 규칙이 계속 평가될 수
///    있고, 매칭되지 않은 규칙은 `current`를 그대로 둡니다.
/// 3. 최종 `current`가 비어 있으면 억제입니다.
///
/// 같은 라인에 매칭되는 두 규칙이 있으면 먼저 등록된 쪽이 이깁니다.
pub fn filter_line<C>(
    line: &str,
    set: &RuleSet<C>,
    ctx: &mut C,
) -> Result<Verdict, FilterError> {
    for rule in set.terminal() {
        if let Some(output) = apply(rule, line, ctx)? {
            return Ok(match output {
                HandlerOutput::Suppress => Verdict::Suppress,
                // 빈 출력은 억제입니다 (Literal 삭제가 라인 전체를 지운 경우)
                HandlerOutput::Line(s) if s.is_empty() => Verdict::Suppress,
                HandlerOutput::Line(s) => Verdict::Emit(s),
                HandlerOutput::Lines(v) => Verdict::EmitMany(v),
            });
        }
    }

    let mut current = line.to_owned();
    for rule in set.chained() {
        if let Some(output) = apply(rule, &current, ctx)? {
            current = match output {
                // 체인 중간의 억제는 빈 문자열이 됩니다
                HandlerOutput::Suppress => String::new(),
                HandlerOutput::Line(s) => s,
                // 다중 라인은 하나의 문자열로 합쳐 체인을 이어갑니다
                HandlerOutput::Lines(v) => v.join("\n"),
            };
        }
    }

    Ok(if current.is_empty() {
        Verdict::Suppress
    } else {
        Verdict::Emit(current)
    })
}

/// 라인 필터 -- 펌프가 다루는 단위
///
/// 구현체는 스트림 하나당 하나씩 생성해야 합니다. 규칙 집합과
/// 세션 상태는 인스턴스별로 소유되며 스트림 간에 공유되지 않습니다.
pub trait LineFilter {
    /// 한 라인을 필터링하여 판정을 반환합니다.
    ///
    /// 치명적 트리거(fast-quit, 인증 실패)와 핸들러 에러는 `Err`로
    /// 전파되어 펌프를 중단시킵니다.
    fn filter_line(&mut self, line: &str) -> Result<Verdict, FilterError>;
}

/// 규칙 집합 + 컨텍스트를 묶은 범용 라인 필터
///
/// 도메인 필터(빌드 출력, 레벨 로그, svn)는 이 타입의 생성 함수로
/// 제공됩니다. 컨텍스트는 필터 인스턴스가 단독으로 소유합니다.
pub struct RuleFilter<C> {
    set: RuleSet<C>,
    ctx: C,
}

impl<C> RuleFilter<C> {
    /// 규칙 집합과 초기 컨텍스트로 필터를 생성합니다.
    pub fn new(set: RuleSet<C>, ctx: C) -> Self {
        Self { set, ctx }
    }

    /// 컨텍스트 참조
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// 컨텍스트 가변 참조 (레벨 규칙 추가 등)
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// 규칙 집합 가변 참조
    pub fn rule_set_mut(&mut self) -> &mut RuleSet<C> {
        &mut self.set
    }
}

impl<C> LineFilter for RuleFilter<C> {
    fn filter_line(&mut self, line: &str) -> Result<Verdict, FilterError> {
        filter_line(line, &self.set, &mut self.ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit<C>(text: &str) -> impl Fn(
        &str,
        &regex::Captures<'_>,
        &mut C,
    ) -> Result<HandlerOutput, FilterError>
    + Send
    + 'static {
        let text = text.to_owned();
        move |_, _, _| Ok(HandlerOutput::Line(text.clone()))
    }

    #[test]
    fn empty_rule_set_round_trips_line() {
        let set = RuleSet::<()>::new();
        let verdict = filter_line("no recognizable markers", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Emit("no recognizable markers".to_owned()));
    }

    #[test]
    fn terminal_match_stops_all_processing() {
        let mut set = RuleSet::<u32>::new();
        set.add_terminal_template(Some("^hit"), Some("terminal won")).unwrap();
        // 이 체인 규칙이 실행되면 컨텍스트가 오염됩니다
        set.add_chained_action(None, |_, _, count: &mut u32| {
            *count += 1;
            Ok(HandlerOutput::Line("chained ran".to_owned()))
        })
        .unwrap();

        let mut count = 0u32;
        let verdict = filter_line("hit me", &set, &mut count).unwrap();
        assert_eq!(verdict, Verdict::Emit("terminal won".to_owned()));
        assert_eq!(count, 0, "chained rule must not run after a terminal match");
    }

    #[test]
    fn earlier_terminal_rule_wins() {
        let mut set = RuleSet::<()>::new();
        set.add_terminal_action(Some("^both"), emit("first")).unwrap();
        set.add_terminal_action(Some("^both"), emit("second")).unwrap();

        let verdict = filter_line("both match", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Emit("first".to_owned()));
    }

    #[test]
    fn chained_rules_transform_in_sequence() {
        let mut set = RuleSet::<()>::new();
        set.add_chained_literal("aaa", Some("bbb"));
        set.add_chained_literal("bbb", Some("ccc"));

        let verdict = filter_line("aaa!", &set, &mut ()).unwrap();
        // 뒤 규칙은 앞 규칙이 변환한 출력 위에서 실행됩니다
        assert_eq!(verdict, Verdict::Emit("ccc!".to_owned()));
    }

    #[test]
    fn chained_non_match_leaves_current_unchanged() {
        let mut set = RuleSet::<()>::new();
        set.add_chained_literal("absent", Some("x"));
        set.add_chained_literal("line", Some("LINE"));

        let verdict = filter_line("a line", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Emit("a LINE".to_owned()));
    }

    #[test]
    fn suppression_mid_chain_stays_empty() {
        let mut set = RuleSet::<()>::new();
        set.add_chained_template(Some("^anything"), None).unwrap();
        // 빈 문자열에 매칭되지 않는 규칙은 내용을 되살리지 못합니다
        set.add_chained_literal("anything", Some("back"));

        let verdict = filter_line("anything here", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Suppress);
    }

    #[test]
    fn later_rule_may_match_empty_current() {
        let mut set = RuleSet::<()>::new();
        set.add_chained_template(Some("^gone"), None).unwrap();
        set.add_chained_action(Some(r"^$"), emit("revived")).unwrap();

        let verdict = filter_line("gone", &set, &mut ()).unwrap();
        // 빈 문자열을 명시적으로 매칭하는 규칙만 내용을 다시 만들 수 있습니다
        assert_eq!(verdict, Verdict::Emit("revived".to_owned()));
    }

    #[test]
    fn template_substitutes_captures() {
        let mut set = RuleSet::<()>::new();
        set.add_terminal_template(Some(r"^U    (.*)$"), Some("updated ${1}"))
            .unwrap();

        let verdict = filter_line("U    src/main.rs", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Emit("updated src/main.rs".to_owned()));
    }

    #[test]
    fn template_output_replaces_the_whole_line() {
        let mut set = RuleSet::<()>::new();
        // 패턴이 라인 끝까지 매칭하지 않아도 출력은 템플릿 전체입니다
        set.add_terminal_template(Some("^hit"), Some("terminal won")).unwrap();

        let verdict = filter_line("hit me", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Emit("terminal won".to_owned()));
    }

    #[test]
    fn terminal_literal_deletion_suppresses_the_line() {
        let mut set = RuleSet::<()>::new();
        set.add_terminal_literal("[INFO] Scanning for projects...", None);

        let verdict = filter_line("[INFO] Scanning for projects...", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Suppress);
    }

    #[test]
    fn literal_replaces_every_occurrence() {
        let mut set = RuleSet::<()>::new();
        set.add_chained_literal("x", Some("y"));

        let verdict = filter_line("x marks x", &set, &mut ()).unwrap();
        assert_eq!(verdict, Verdict::Emit("y marks y".to_owned()));
    }

    #[test]
    fn action_may_emit_multiple_lines() {
        let mut set = RuleSet::<()>::new();
        set.add_terminal_action(Some("^expand"), |_, _, _| {
            Ok(HandlerOutput::Lines(vec!["one".to_owned(), "two".to_owned()]))
        })
        .unwrap();

        let verdict = filter_line("expand me", &set, &mut ()).unwrap();
        assert_eq!(
            verdict,
            Verdict::EmitMany(vec!["one".to_owned(), "two".to_owned()])
        );
    }

    #[test]
    fn handler_error_propagates() {
        let mut set = RuleSet::<()>::new();
        set.add_terminal_action(Some("^boom"), |line, _, _| {
            Err(FilterError::Handler {
                reason: format!("exploded on: {line}"),
            })
        })
        .unwrap();

        let result = filter_line("boom", &set, &mut ());
        assert!(matches!(result, Err(FilterError::Handler { .. })));
    }

    #[test]
    fn context_is_threaded_through_action_handlers() {
        let mut set = RuleSet::<Vec<String>>::new();
        set.add_terminal_action(Some(r"^remember (.*)$"), |_, caps, seen: &mut Vec<String>| {
            seen.push(caps[1].to_owned());
            Ok(HandlerOutput::Suppress)
        })
        .unwrap();

        let mut seen = Vec::new();
        filter_line("remember this", &set, &mut seen).unwrap();
        filter_line("remember that", &set, &mut seen).unwrap();
        assert_eq!(seen, vec!["this".to_owned(), "that".to_owned()]);
    }
}
