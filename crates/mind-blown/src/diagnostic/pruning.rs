use super::answers::{AnswerSheet, Choice, QuestionKey};

/// Return a copy of `answers` with every field downstream of `edited` cleared.
///
/// Downstream fields are cleared whatever their value, so an edit can never leave a
/// now-unreachable answer feeding the classifier. The bonus answer is dropped whenever
/// `E` is `no`, since no level above zero is reachable from there.
pub fn prune_downstream(edited: QuestionKey, answers: &AnswerSheet) -> AnswerSheet {
    let mut pruned = *answers;
    for key in edited.downstream() {
        pruned.clear(*key);
    }
    if pruned.expectation == Some(Choice::No) {
        pruned.still_thinking = None;
    }
    pruned
}
