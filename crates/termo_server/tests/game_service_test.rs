//! Tests for the game session state machine over an in-memory repository.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use termo_rules::Game;
use termo_server::{
    ActiveOutcome, AttemptOutcome, GameService, ScoreRepository, SessionRepository, StartOutcome,
};

/// In-memory repository double with the same optimistic index guard as the
/// SQLite implementation.
#[derive(Debug, Default)]
struct InMemoryRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    sessions: Vec<StoredSession>,
    scores: HashMap<i64, u32>,
    fail_next_append: bool,
}

#[derive(Debug)]
struct StoredSession {
    id: i64,
    player: i64,
    words: Vec<String>,
    attempts: Vec<String>,
    active: bool,
}

impl InMemoryRepository {
    fn fail_next_append(&self) {
        self.inner.lock().unwrap().fail_next_append = true;
    }

    fn score_of(&self, player: i64) -> u32 {
        *self
            .inner
            .lock()
            .unwrap()
            .scores
            .get(&player)
            .unwrap_or(&0)
    }

    fn session_of(&self, player: i64) -> Option<(Vec<String>, Vec<String>, bool)> {
        self.inner
            .lock()
            .unwrap()
            .sessions
            .iter()
            .find(|s| s.player == player)
            .map(|s| (s.words.clone(), s.attempts.clone(), s.active))
    }
}

impl SessionRepository for InMemoryRepository {
    fn create_session(&self, player: i64, secret_words: &[String]) -> Result<i64> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.sessions.push(StoredSession {
            id,
            player,
            words: secret_words.to_vec(),
            attempts: Vec::new(),
            active: true,
        });
        Ok(id)
    }

    fn get_active_session(&self, player: i64) -> Result<Option<Game>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .sessions
            .iter()
            .find(|s| s.player == player && s.active)
            .map(|s| Game::new(s.id, s.words.clone(), s.attempts.clone(), s.active)))
    }

    fn append_attempt(
        &self,
        session_id: i64,
        guess: &str,
        index: u32,
        is_terminal: bool,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_next_append {
            inner.fail_next_append = false;
            return Err(anyhow!("injected append failure"));
        }
        let session = inner
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| anyhow!("no such session"))?;
        // Mirror of the SQLite UNIQUE (game_id, idx) guard.
        if session.attempts.len() as u32 != index {
            return Err(anyhow!("stale attempt index"));
        }
        session.attempts.push(guess.to_string());
        if is_terminal {
            session.active = false;
        }
        Ok(())
    }

    fn finish_session(&self, session_id: i64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| anyhow!("no such session"))?;
        session.active = false;
        Ok(())
    }
}

impl ScoreRepository for InMemoryRepository {
    fn increment_score(&self, player: i64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        *inner.scores.entry(player).or_default() += 1;
        Ok(())
    }
}

const PLAYER: i64 = 1;

fn service(words: &[&str]) -> GameService<InMemoryRepository> {
    GameService::new(words.iter().copied(), InMemoryRepository::default())
}

/// Unwraps a successful attempt into (won, finished, revealed_words).
fn unpack(outcome: AttemptOutcome) -> (bool, bool, Option<Vec<String>>) {
    match outcome {
        AttemptOutcome::Success {
            won,
            finished,
            revealed_words,
            ..
        } => (won, finished, revealed_words),
        other => panic!("expected success, got {other:?}"),
    }
}

#[test]
fn test_start_draws_requested_words_and_fixes_budget() {
    let svc = service(&["cat", "dog", "owl", "pig", "hen", "fox"]);
    let outcome = svc.start(PLAYER, 3, 2).expect("Start failed");
    assert_eq!(outcome, StartOutcome::Success { max_attempts: 7 });

    let (words, attempts, active) = svc.repository().session_of(PLAYER).expect("No session");
    assert_eq!(words.len(), 2);
    assert!(attempts.is_empty());
    assert!(active);
    for word in &words {
        assert_eq!(word.chars().count(), 3);
    }
    let mut unique = words.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 2, "secret words must be distinct");
}

#[test]
fn test_start_rejects_second_active_session() {
    let svc = service(&["cat", "dog"]);
    svc.start(PLAYER, 3, 1).expect("Start failed");
    let outcome = svc.start(PLAYER, 3, 1).expect("Start failed");
    assert_eq!(outcome, StartOutcome::AlreadyActive);
}

#[test]
fn test_start_validates_word_length_bounds() {
    let svc = service(&["cat", "dog"]);
    assert_eq!(
        svc.start(PLAYER, 2, 1).expect("Start failed"),
        StartOutcome::InvalidWordLength
    );
    assert_eq!(
        svc.start(PLAYER, 23, 1).expect("Start failed"),
        StartOutcome::InvalidWordLength
    );
    // In bounds, but the corpus has no four-letter words.
    assert_eq!(
        svc.start(PLAYER, 4, 1).expect("Start failed"),
        StartOutcome::InvalidWordLength
    );
}

#[test]
fn test_start_validates_word_count_bounds() {
    let svc = service(&["cat", "dog"]);
    assert_eq!(
        svc.start(PLAYER, 3, 0).expect("Start failed"),
        StartOutcome::InvalidCount
    );
    assert_eq!(
        svc.start(PLAYER, 3, 21).expect("Start failed"),
        StartOutcome::InvalidCount
    );
    // In bounds, but only two distinct three-letter words exist.
    assert_eq!(
        svc.start(PLAYER, 3, 3).expect("Start failed"),
        StartOutcome::InvalidCount
    );
}

#[test]
fn test_attempt_without_session() {
    let svc = service(&["cat", "dog"]);
    let outcome = svc.attempt(PLAYER, "cat").expect("Attempt failed");
    assert_eq!(outcome, AttemptOutcome::NoActiveSession);
}

#[test]
fn test_attempt_rejects_wrong_length_without_recording() {
    let svc = service(&["cat", "dog"]);
    svc.start(PLAYER, 3, 1).expect("Start failed");

    let outcome = svc.attempt(PLAYER, "mouse").expect("Attempt failed");
    assert_eq!(outcome, AttemptOutcome::InvalidGuess);

    let (_, attempts, active) = svc.repository().session_of(PLAYER).expect("No session");
    assert!(attempts.is_empty());
    assert!(active);
}

#[test]
fn test_attempt_normalizes_guess_before_everything() {
    // The corpus holds a single word, so the secret is known.
    let svc = service(&["maçã"]);
    svc.start(PLAYER, 4, 1).expect("Start failed");

    // Raw guess differs in case, accents, and padding; it still wins.
    let (won, finished, revealed) = unpack(svc.attempt(PLAYER, "  MAÇÃ ").expect("Attempt failed"));
    assert!(won);
    assert!(finished);
    assert_eq!(revealed, Some(vec!["maçã".to_string()]));

    let (_, attempts, _) = svc.repository().session_of(PLAYER).expect("No session");
    assert_eq!(attempts, vec!["maca".to_string()]);
}

#[test]
fn test_win_requires_every_word_in_any_order() {
    // Corpus bucket equals the word count, so both words are secret.
    let svc = service(&["cat", "dog"]);
    svc.start(PLAYER, 3, 2).expect("Start failed");

    let (won, finished, revealed) = unpack(svc.attempt(PLAYER, "cow").expect("Attempt failed"));
    assert!(!won && !finished && revealed.is_none());

    let (won, finished, revealed) = unpack(svc.attempt(PLAYER, "dog").expect("Attempt failed"));
    assert!(!won && !finished && revealed.is_none());

    let (won, finished, revealed) = unpack(svc.attempt(PLAYER, "cat").expect("Attempt failed"));
    assert!(won);
    assert!(finished);
    let mut revealed = revealed.expect("revealed words missing on terminal transition");
    revealed.sort();
    assert_eq!(revealed, vec!["cat".to_string(), "dog".to_string()]);

    let (_, _, active) = svc.repository().session_of(PLAYER).expect("No session");
    assert!(!active);
    assert_eq!(svc.repository().score_of(PLAYER), 1);
}

#[test]
fn test_partial_match_never_wins() {
    let svc = service(&["cat"]);
    svc.start(PLAYER, 3, 1).expect("Start failed");

    // Same letters, wrong positions: present everywhere, still no win.
    let (won, finished, _) = unpack(svc.attempt(PLAYER, "tac").expect("Attempt failed"));
    assert!(!won);
    assert!(!finished);
}

#[test]
fn test_budget_exhaustion_finishes_as_loss() {
    // word_count = 3 fixes the budget at 8.
    let svc = service(&["cat", "dog", "owl"]);
    let outcome = svc.start(PLAYER, 3, 3).expect("Start failed");
    assert_eq!(outcome, StartOutcome::Success { max_attempts: 8 });

    // "cat" alone can never match all three words.
    for i in 0..7 {
        let (won, finished, revealed) =
            unpack(svc.attempt(PLAYER, "cat").expect("Attempt failed"));
        assert!(!won, "attempt {i} must not win");
        assert!(!finished, "attempt {i} must not finish");
        assert!(revealed.is_none());
    }

    let (won, finished, revealed) = unpack(svc.attempt(PLAYER, "cat").expect("Attempt failed"));
    assert!(!won);
    assert!(finished, "eighth attempt exhausts the budget");
    let revealed = revealed.expect("revealed words missing on loss");
    assert_eq!(revealed.len(), 3);

    let (_, attempts, active) = svc.repository().session_of(PLAYER).expect("No session");
    assert_eq!(attempts.len(), 8);
    assert!(!active);
    assert_eq!(svc.repository().score_of(PLAYER), 0, "a loss scores nothing");

    // The session is gone; nothing re-triggers the reveal.
    assert_eq!(
        svc.attempt(PLAYER, "cat").expect("Attempt failed"),
        AttemptOutcome::NoActiveSession
    );
}

#[test]
fn test_win_on_last_attempt_still_scores() {
    let svc = service(&["cat"]);
    svc.start(PLAYER, 3, 1).expect("Start failed");

    for _ in 0..5 {
        let (won, finished, _) = unpack(svc.attempt(PLAYER, "cow").expect("Attempt failed"));
        assert!(!won && !finished);
    }

    // Sixth and last attempt in the budget wins.
    let (won, finished, revealed) = unpack(svc.attempt(PLAYER, "cat").expect("Attempt failed"));
    assert!(won);
    assert!(finished);
    assert!(revealed.is_some());
    assert_eq!(svc.repository().score_of(PLAYER), 1);
}

#[test]
fn test_repository_failure_leaves_session_unchanged() {
    let svc = service(&["cat"]);
    svc.start(PLAYER, 3, 1).expect("Start failed");

    svc.repository().fail_next_append();
    let result = svc.attempt(PLAYER, "cat");
    assert!(result.is_err(), "collaborator failure must propagate");

    let (_, attempts, active) = svc.repository().session_of(PLAYER).expect("No session");
    assert!(attempts.is_empty(), "failed append must record nothing");
    assert!(active);
    assert_eq!(svc.repository().score_of(PLAYER), 0);

    // The session is intact; the same attempt succeeds afterwards.
    let (won, _, _) = unpack(svc.attempt(PLAYER, "cat").expect("Attempt failed"));
    assert!(won);
    assert_eq!(svc.repository().score_of(PLAYER), 1);
}

#[test]
fn test_active_session_rescores_history() {
    let svc = service(&["cat", "dog"]);
    svc.start(PLAYER, 3, 2).expect("Start failed");
    svc.attempt(PLAYER, "cow").expect("Attempt failed");
    svc.attempt(PLAYER, "dog").expect("Attempt failed");

    let outcome = svc.active_session(PLAYER).expect("Query failed");
    let ActiveOutcome::Success { session } = outcome else {
        panic!("expected an active session");
    };

    assert_eq!(*session.word_length(), 3);
    assert_eq!(*session.word_count(), 2);
    assert_eq!(*session.max_attempts(), 7);
    assert_eq!(
        session.attempts(),
        &vec!["cow".to_string(), "dog".to_string()]
    );
    assert_eq!(session.boards().len(), 2);
    for board in session.boards() {
        assert_eq!(board.len(), 2, "one word state per secret word");
        for word_state in board {
            assert_eq!(word_state.len(), 3, "one letter state per position");
        }
    }

    // Recomputation is idempotent: asking again yields the same view.
    let again = svc.active_session(PLAYER).expect("Query failed");
    let ActiveOutcome::Success { session: second } = again else {
        panic!("expected an active session");
    };
    assert_eq!(session, second);
}

#[test]
fn test_active_session_none_after_finish() {
    let svc = service(&["cat"]);
    svc.start(PLAYER, 3, 1).expect("Start failed");
    svc.attempt(PLAYER, "cat").expect("Attempt failed");

    assert_eq!(
        svc.active_session(PLAYER).expect("Query failed"),
        ActiveOutcome::NoActiveSession
    );
}

#[test]
fn test_concurrent_attempts_cannot_overrun_the_budget() {
    // One slot left in the budget; two racing attempts may interleave
    // arbitrarily, but exactly one terminal attempt can ever commit.
    let svc = service(&["cat", "dog"]);
    svc.start(PLAYER, 3, 2).expect("Start failed");
    for _ in 0..6 {
        svc.attempt(PLAYER, "cow").expect("Attempt failed");
    }

    let results = std::thread::scope(|scope| {
        let a = scope.spawn(|| svc.attempt(PLAYER, "owl"));
        let b = scope.spawn(|| svc.attempt(PLAYER, "hen"));
        [a.join().unwrap(), b.join().unwrap()]
    });

    let successes = results
        .iter()
        .filter(|r| matches!(r, Ok(AttemptOutcome::Success { .. })))
        .count();
    assert_eq!(successes, 1, "exactly one racer records the final attempt");

    let (_, attempts, active) = svc.repository().session_of(PLAYER).expect("No session");
    assert_eq!(attempts.len(), 7, "budget must never be overrun");
    assert!(!active, "session must end exactly once");
}
