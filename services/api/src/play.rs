use clap::Args;
use mind_blown::config::AppConfig;
use mind_blown::diagnostic::{
    bonus_prompt, evaluate, legend, prompt, AnswerSheet, AnswerValue, DiagnosticSession,
    EvaluateRequest, EvaluateResponse, QuestionPrompt, ResultView, Stage,
};
use mind_blown::error::AppError;
use mind_blown::telemetry;
use std::io::{self, BufRead, Write};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Answers as KEY=VALUE pairs, e.g. "E=yes,R=whoa,Q3=no". `A` sets the bonus answer.
    #[arg(long)]
    pub(crate) answers: Option<String>,
    /// Print the full evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

/// How an interactive run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlayOutcome {
    Finished(AnswerSheet),
    Quit,
}

enum Input<'a> {
    Back,
    Reset,
    Quit,
    Answer(&'a str),
}

impl<'a> Input<'a> {
    fn parse(raw: &'a str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "b" | "back" => Self::Back,
            "r" | "reset" => Self::Reset,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Answer(raw.trim()),
        }
    }
}

pub(crate) fn run_play() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_terminal(&config.telemetry)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    match play(stdin.lock(), stdout.lock())? {
        PlayOutcome::Finished(answers) => info!(%answers, "interactive diagnostic finished"),
        PlayOutcome::Quit => info!("interactive diagnostic abandoned"),
    }
    Ok(())
}

/// Walk the diagnostic one question at a time, reading answers line by line.
pub(crate) fn play<R, W>(mut input: R, mut out: W) -> Result<PlayOutcome, AppError>
where
    R: BufRead,
    W: Write,
{
    let mut session = DiagnosticSession::new();
    writeln!(out, "Mind-Blown Diagnostic")?;
    writeln!(out, "Answer with an option number or name. b = back, r = reset, q = quit.")?;

    loop {
        match session.stage() {
            Stage::Question => {
                let question = prompt(session.current());
                let progress = session.progress();
                writeln!(out)?;
                writeln!(out, "{} ({}%)", progress.label, progress.percent)?;
                render_prompt(&mut out, &question)?;

                let Some(line) = read_answer(&mut input, &mut out)? else {
                    return Ok(PlayOutcome::Quit);
                };
                match Input::parse(&line) {
                    Input::Back => session.go_back(),
                    Input::Reset => session.reset(),
                    Input::Quit => return Ok(PlayOutcome::Quit),
                    Input::Answer(raw) => match question.match_input(raw) {
                        Some(value) => {
                            if let Err(err) = session.answer(session.current(), value) {
                                writeln!(out, "{err}")?;
                            }
                        }
                        None => writeln!(out, "Please pick one of the listed options.")?,
                    },
                }
            }
            Stage::Final if session.bonus_offered() && session.answers().still_thinking.is_none() => {
                let view = session.view();
                writeln!(out)?;
                writeln!(out, "Result so far: {}", view.result.label)?;
                let bonus = bonus_prompt();
                render_prompt(&mut out, &bonus)?;

                let Some(line) = read_answer(&mut input, &mut out)? else {
                    return Ok(PlayOutcome::Quit);
                };
                match Input::parse(&line) {
                    Input::Back => session.go_back(),
                    Input::Reset => session.reset(),
                    Input::Quit => return Ok(PlayOutcome::Quit),
                    Input::Answer(raw) => match bonus.match_input(raw) {
                        Some(AnswerValue::Choice(choice)) => {
                            if let Err(err) = session.answer_bonus(choice) {
                                writeln!(out, "{err}")?;
                            }
                        }
                        _ => writeln!(out, "Please answer yes or no.")?,
                    },
                }
            }
            Stage::Final => {
                let view = session.view();
                render_result(&mut out, &view.result)?;
                writeln!(out)?;
                writeln!(out, "{}", view.share_text)?;
                return Ok(PlayOutcome::Finished(*session.answers()));
            }
        }
    }
}

fn render_prompt<W: Write>(out: &mut W, question: &QuestionPrompt) -> io::Result<()> {
    writeln!(out, "{}", question.title)?;
    writeln!(out, "  {}", question.description)?;
    for (index, option) in question.options.iter().enumerate() {
        writeln!(out, "  {}) {}", index + 1, option.label)?;
    }
    Ok(())
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<String>> {
    write!(out, "> ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn render_result<W: Write>(out: &mut W, result: &ResultView) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== {} ==", result.label)?;
    if let Some(blurb) = result.blurb {
        writeln!(out, "{blurb}")?;
    }
    if let Some(quip) = result.quip {
        writeln!(out, "{quip}")?;
    }
    if result.celebrate {
        writeln!(out, "*** Certified mind-blown! ***")?;
    }
    writeln!(out, "Intensity: {}%", result.intensity)?;
    writeln!(out, "Path:")?;
    for step in &result.path {
        writeln!(out, "  - {step}")?;
    }
    Ok(())
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_terminal(&config.telemetry)?;

    let response = evaluate_snapshot(args.answers.as_deref().unwrap_or_default())?;
    render_evaluation(io::stdout().lock(), &response, args.json)
}

fn evaluate_snapshot(raw: &str) -> Result<EvaluateResponse, AppError> {
    let answers: AnswerSheet = raw.parse()?;
    Ok(evaluate(&EvaluateRequest {
        answers,
        current: None,
    }))
}

fn render_evaluation<W: Write>(
    mut out: W,
    response: &EvaluateResponse,
    json: bool,
) -> Result<(), AppError> {
    if json {
        serde_json::to_writer_pretty(&mut out, response).map_err(io::Error::from)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Result: {}", response.result.label)?;
    if !response.result.path.is_empty() {
        writeln!(out, "Path: {}", response.result.path.join(" → "))?;
    }
    if !response.next.is_final() {
        writeln!(
            out,
            "Next question: {} (at most {} to go)",
            response.next, response.worst_case_remaining
        )?;
    }
    writeln!(out, "{}", response.share_text)?;
    Ok(())
}

pub(crate) fn run_levels() -> Result<(), AppError> {
    render_levels(io::stdout().lock())
}

fn render_levels<W: Write>(mut out: W) -> Result<(), AppError> {
    for entry in legend() {
        writeln!(out, "Level {}: {}", entry.level.index(), entry.name)?;
        writeln!(out, "  {}", entry.blurb)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mind_blown::diagnostic::{classify, BlownLevel, Choice, QuestionKey, Reaction};
    use std::io::Cursor;

    fn run(script: &str) -> (PlayOutcome, String) {
        let mut out = Vec::new();
        let outcome = play(Cursor::new(script.to_string()), &mut out).expect("play runs");
        (outcome, String::from_utf8(out).expect("utf8 transcript"))
    }

    fn finished(outcome: PlayOutcome) -> AnswerSheet {
        match outcome {
            PlayOutcome::Finished(answers) => answers,
            PlayOutcome::Quit => panic!("expected the diagnostic to finish"),
        }
    }

    #[test]
    fn no_surprise_finishes_after_one_question() {
        let (outcome, transcript) = run("n\n");
        let answers = finished(outcome);
        assert_eq!(classify(&answers).level, Some(BlownLevel::NotBlown));
        assert!(!transcript.contains("Bonus"));
        assert!(transcript.contains(
            "Mind-Blown Diagnostic Result: Level 0 – Not Blown. Path: No expectation challenge → Level 0."
        ));
    }

    #[test]
    fn whoa_chain_offers_the_bonus_and_applies_it() {
        let (outcome, transcript) = run("yes\n3\ny\ny\ny\nn\ny\n");
        let answers = finished(outcome);
        assert_eq!(answers.reaction, Some(Reaction::Whoa));
        assert_eq!(answers.still_thinking, Some(Choice::Yes));
        assert_eq!(classify(&answers).level, Some(BlownLevel::ExistenceLevel));
        assert!(transcript.contains("Result so far: Thoroughly Blown (Level 3)"));
        assert!(transcript.contains("== Existence-Level Blown (Level 4) =="));
        assert!(transcript.contains("Step 1 of 6 (0%)"));
    }

    #[test]
    fn back_reopens_the_previous_question_and_prunes() {
        let (outcome, _) = run("y\nb\nn\n");
        let answers = finished(outcome);
        assert_eq!(answers.expectation, Some(Choice::No));
        assert!(!answers.is_answered(QuestionKey::R));
    }

    #[test]
    fn back_from_the_bonus_reopens_the_last_question() {
        let (outcome, _) = run("y\ndouble\ny\nback\nn\n");
        let answers = finished(outcome);
        assert_eq!(answers.light_signs, Some(Choice::No));
        assert_eq!(classify(&answers).level, Some(BlownLevel::NotBlown));
    }

    #[test]
    fn unknown_input_is_reported_and_quit_stops() {
        let (outcome, transcript) = run("maybe\nq\n");
        assert_eq!(outcome, PlayOutcome::Quit);
        assert!(transcript.contains("Please pick one of the listed options."));
    }

    #[test]
    fn end_of_input_counts_as_quit() {
        let (outcome, _) = run("y\n");
        assert_eq!(outcome, PlayOutcome::Quit);
    }

    #[test]
    fn evaluation_text_names_the_next_question() {
        let response = evaluate_snapshot("E=yes,R=whoa").expect("answers parse");
        let mut out = Vec::new();
        render_evaluation(&mut out, &response, false).expect("renders");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Result: Need more inputs"));
        assert!(text.contains("Next question: Q3 (at most 4 to go)"));
    }

    #[test]
    fn evaluation_json_carries_the_classification() {
        let response = evaluate_snapshot("E=no").expect("answers parse");
        let mut out = Vec::new();
        render_evaluation(&mut out, &response, true).expect("renders");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
        assert_eq!(value["next"], "final");
        assert_eq!(value["classification"]["level"], 0);
    }

    #[test]
    fn bad_snapshots_surface_as_input_errors() {
        let err = evaluate_snapshot("E=yes,Q2=yes").expect_err("Q2 is not a question");
        assert!(matches!(err, AppError::Input(_)));
        assert!(err.to_string().contains("Q2"));

        let empty = evaluate_snapshot("").expect("empty snapshot is allowed");
        assert_eq!(empty.next.to_string(), "E");
    }

    #[test]
    fn levels_lists_all_five() {
        let mut out = Vec::new();
        render_levels(&mut out).expect("renders");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().filter(|line| line.starts_with("Level ")).count(), 5);
    }
}
