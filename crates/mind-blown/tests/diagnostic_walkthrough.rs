//! End-to-end walks through the public engine and session facade, mirroring how a front
//! end drives the questionnaire: answer, prune, route, classify.

use mind_blown::diagnostic::{
    classify, frontier, next_question, prune_downstream, share_text, worst_case_remaining,
    AnswerSheet, BlownLevel, Choice, DiagnosticSession, Next, QuestionKey, Reaction, Stage,
};

#[test]
fn compact_snapshot_classifies_like_the_session() {
    let sheet: AnswerSheet = "E=yes,R=whoa,Q3=yes,Q4=yes,Q5=yes,Q6=yes"
        .parse()
        .expect("snapshot parses");
    assert_eq!(classify(&sheet).level, Some(BlownLevel::ExistenceLevel));

    let mut session = DiagnosticSession::new();
    while session.stage() == Stage::Question {
        let key = session.current();
        let value = sheet.get(key).expect("snapshot answers every routed question");
        session.answer(key, value).expect("answer accepted");
    }
    assert_eq!(session.classification(), classify(&sheet));
}

#[test]
fn front_end_loop_uses_only_the_pure_functions() {
    let script: [(QuestionKey, mind_blown::diagnostic::AnswerValue); 3] = [
        (QuestionKey::E, Choice::Yes.into()),
        (QuestionKey::R, Reaction::Whoa.into()),
        (QuestionKey::Q3, Choice::No.into()),
    ];

    let mut answers = AnswerSheet::new();
    let mut current = Next::Question(QuestionKey::E);
    let mut steps = 0;

    for (key, value) in script {
        assert_eq!(current, Next::Question(key));
        answers.set(key, value).expect("valid answer");
        answers = prune_downstream(key, &answers);
        current = next_question(key, &answers);
        steps += 1;
        assert!(worst_case_remaining(current, &answers) <= 6 - steps);
    }

    assert_eq!(current, Next::Final);
    assert_eq!(frontier(&answers), Next::Final);

    let result = classify(&answers);
    assert_eq!(result.level, Some(BlownLevel::Mildly));
    assert_eq!(
        share_text(&result),
        "Mind-Blown Diagnostic Result: Level 1 – Mildly Blown. Path: Expectations challenged → No awe signs → Level 1."
    );
}

#[test]
fn session_serializes_and_resumes() {
    let mut session = DiagnosticSession::new();
    session
        .answer(QuestionKey::E, Choice::Yes.into())
        .expect("E accepted");

    let json = serde_json::to_string(&session).expect("serializes");
    let mut resumed: DiagnosticSession = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(resumed, session);

    resumed
        .answer(QuestionKey::R, Reaction::Double.into())
        .expect("R accepted");
    assert_eq!(resumed.current(), QuestionKey::Q1);
}
