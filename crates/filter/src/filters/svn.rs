//! svn update 출력 필터
//!
//! `svn update`의 진행 라인을 간결하게 다시 쓰고, 리비전/외부 참조
//! 소음을 억제합니다. 인증 요구 라인은 치명적 에러로 전파되어 펌프를
//! 중단시킵니다 -- 파이프 너머의 svn은 입력을 받을 수 없기 때문입니다.
//!
//! 모든 규칙은 terminal이며, 마지막 catch-all이 알 수 없는 출력을
//! 흐리게 표시해 어떤 라인도 조용히 사라지지 않게 합니다.

use logsift_core::colour::{BROWN, CYAN, GREEN, NONE, PURPLE};
use logsift_core::colour::expand_colours;

use crate::engine::RuleFilter;
use crate::error::FilterError;
use crate::rule::{HandlerOutput, RuleSet};

/// svn update 출력 필터를 생성합니다.
pub fn svn_update_filter() -> Result<RuleFilter<()>, FilterError> {
    let mut set = RuleSet::<()>::new();

    set.add_terminal_action(Some(r"^Updating (.*)$"), |_, caps, _| {
        Ok(HandlerOutput::Line(format!(
            "Updating... {GREEN}{}{NONE}",
            &caps[1]
        )))
    })?;
    set.add_terminal_template(Some(r"^At revision (.*)\.$"), None)?;
    set.add_terminal_template(Some(r"^Skipped '\.'$"), None)?;
    set.add_terminal_action(Some(r"^U    (.*)$"), |_, caps, _| {
        Ok(HandlerOutput::Line(format!("U {CYAN}{}{NONE}", &caps[1])))
    })?;
    set.add_terminal_action(Some(r"^A    (.*)$"), |_, caps, _| {
        Ok(HandlerOutput::Line(format!("A {PURPLE}{}{NONE}", &caps[1])))
    })?;
    set.add_terminal_action(Some(r"^D    (.*)$"), |_, caps, _| {
        Ok(HandlerOutput::Line(format!("D {BROWN}{}{NONE}", &caps[1])))
    })?;
    set.add_terminal_template(Some(r"^Fetching external item into '(.*)'$"), None)?;
    set.add_terminal_template(Some(r"^External at revision (.*)\.$"), None)?;
    set.add_terminal_action(Some(r"^Updated to revision (.*)\.$"), |_, caps, _| {
        Ok(HandlerOutput::Line(format!(
            "At r{GREEN}{}{NONE}.",
            &caps[1]
        )))
    })?;
    set.add_terminal_action(
        Some(r"^Updated external to revision (.*)\.$"),
        |_, caps, _| {
            Ok(HandlerOutput::Line(format!(
                "External at r{GREEN}{}{NONE}.",
                &caps[1]
            )))
        },
    )?;

    // 인증 요구: 파이프 뒤에서는 응답할 수 없으므로 즉시 중단합니다
    set.add_terminal_action(
        Some(r"^.*Please login using your .* username and password\.$"),
        |line, _, _| {
            Err(FilterError::AuthFailure {
                line: line.to_owned(),
            })
        },
    )?;

    set.add_terminal_template(Some(r"^\s*$"), None)?;

    // catch-all
    set.add_terminal_action(None, |line, _, _| {
        Ok(HandlerOutput::Line(expand_colours(&format!(
            "${{GRAY}}(unmatched) ${{NONE}}\"{line}\""
        ))))
    })?;

    Ok(RuleFilter::new(set, ()))
}
