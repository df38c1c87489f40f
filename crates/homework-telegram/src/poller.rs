//! Homework status polling loop.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use homework_core::{
    check_response, parse_status, BotConfig, ErrorKey, HomeworkError, HomeworkSource, Result,
};

use crate::notifier::Notifier;

/// Logged when a cycle finds nothing new.
const NO_CHANGE_MESSAGE: &str = "Статус работы не изменился";

/// What a successful cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The latest homework was translated and delivered.
    StatusChanged { message: String },
    /// The API reported no homeworks since the cursor.
    NoChange,
}

/// Polls the homework API and forwards status changes.
///
/// Owns the poll cursor and the last-seen error; nothing else touches them.
pub struct HomeworkPoller<S, N> {
    source: S,
    notifier: N,
    /// Lower bound (Unix seconds) for the next fetch.
    cursor: i64,
    /// Key of the most recent caught error.
    last_error: Option<ErrorKey>,
    retry_period: Duration,
}

impl<S: HomeworkSource, N: Notifier> HomeworkPoller<S, N> {
    /// Creates a poller starting at the configured look-back.
    pub fn new(source: S, notifier: N, config: &BotConfig) -> Self {
        Self::with_cursor(source, notifier, config.initial_cursor(), config.retry_period)
    }

    /// Creates a poller with an explicit starting cursor.
    pub fn with_cursor(source: S, notifier: N, cursor: i64, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            cursor,
            last_error: None,
            retry_period,
        }
    }

    /// Current poll cursor.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Key of the last error seen by the loop.
    pub fn last_error(&self) -> Option<&ErrorKey> {
        self.last_error.as_ref()
    }

    /// Source the poller fetches from.
    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Notifier the poller delivers to.
    #[cfg(test)]
    pub(crate) fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Runs cycles forever, sleeping the retry period after each one.
    pub async fn run(&mut self) {
        info!(
            cursor = self.cursor,
            retry_period_secs = self.retry_period.as_secs(),
            "starting homework poller"
        );

        loop {
            self.tick().await;
            sleep(self.retry_period).await;
        }
    }

    /// Runs one cycle and absorbs its failure.
    pub async fn tick(&mut self) {
        match self.run_cycle().await {
            Ok(CycleOutcome::NoChange) => debug!(cursor = self.cursor, "{}", NO_CHANGE_MESSAGE),
            Ok(CycleOutcome::StatusChanged { .. }) => {
                debug!(cursor = self.cursor, "status change delivered");
            }
            Err(e) => self.handle_error(e).await,
        }
    }

    /// Fetch, validate, translate, notify, then advance the cursor.
    ///
    /// The cursor only moves when every step before it succeeded, so an
    /// undelivered status change is fetched and sent again next cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let response = self.source.fetch(self.cursor).await?;
        let page = check_response(response)?;

        let outcome = match page.latest() {
            Some(homework) => {
                let message = parse_status(homework)?;
                self.notifier.send(&message).await?;
                CycleOutcome::StatusChanged { message }
            }
            None => CycleOutcome::NoChange,
        };

        self.cursor = page.current_date;
        Ok(outcome)
    }

    async fn handle_error(&mut self, error: HomeworkError) {
        error!(kind = ?error.kind(), error = %error, "homework check failed");

        let key = error.key();
        let repeated = self.last_error.as_ref() == Some(&key);

        if error.is_reportable() && !repeated {
            self.report(&error.to_string()).await;
        } else if repeated {
            debug!(kind = ?key.kind, "same error as previous cycle, not notifying");
        }

        self.last_error = Some(key);
    }

    /// Sends an error report; a delivery failure is logged and otherwise ignored.
    async fn report(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            warn!(error = %e, "Failed to send error report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use homework_core::ErrorKind;
    use serde_json::{json, Value};

    const RETRY: Duration = Duration::from_secs(600);
    const START: i64 = 1_699_000_000;

    /// Replays queued answers; once drained, reports an empty page at the
    /// requested cursor.
    #[derive(Default)]
    struct MockSource {
        answers: Mutex<VecDeque<Result<Value>>>,
        calls: Mutex<Vec<i64>>,
    }

    impl MockSource {
        fn with(answers: Vec<Result<Value>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<i64> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HomeworkSource for MockSource {
        async fn fetch(&self, from_date: i64) -> Result<Value> {
            self.calls.lock().unwrap().push(from_date);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": [], "current_date": from_date})))
        }
    }

    /// Records delivered messages; the first `failures` sends are rejected.
    #[derive(Default)]
    struct MockNotifier {
        sent: Mutex<Vec<String>>,
        failures: Mutex<usize>,
    }

    impl MockNotifier {
        fn failing(failures: usize) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                failures: Mutex::new(failures),
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, text: &str) -> Result<()> {
            let mut failures = self.failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(HomeworkError::Delivery("chat not found".to_string()));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn poller(answers: Vec<Result<Value>>) -> HomeworkPoller<MockSource, MockNotifier> {
        HomeworkPoller::with_cursor(MockSource::with(answers), MockNotifier::default(), START, RETRY)
    }

    fn homework(status: &str) -> Value {
        json!({
            "homeworks": [{"homework_name": "diploma", "status": status}],
            "current_date": 1700000000
        })
    }

    #[tokio::test]
    async fn test_approved_homework_is_notified() {
        let mut poller = poller(vec![Ok(homework("approved"))]);

        poller.tick().await;

        assert_eq!(
            poller.notifier().sent(),
            vec!["Изменился статус проверки работы \"diploma\". Работа проверена: ревьюеру всё понравилось. Ура!"]
        );
        assert_eq!(poller.cursor(), 1_700_000_000);
        assert_eq!(poller.source().calls(), vec![START]);
    }

    #[tokio::test]
    async fn test_empty_list_advances_without_notification() {
        let mut poller = poller(vec![Ok(json!({"homeworks": [], "current_date": 1700000100}))]);

        let outcome = poller.run_cycle().await.unwrap();

        assert_eq!(outcome, CycleOutcome::NoChange);
        assert!(poller.notifier().sent().is_empty());
        assert_eq!(poller.cursor(), 1_700_000_100);
    }

    #[tokio::test]
    async fn test_api_unavailable_is_logged_only() {
        let mut poller = poller(vec![Err(HomeworkError::ApiUnavailable(503))]);

        poller.tick().await;

        assert!(poller.notifier().sent().is_empty());
        assert_eq!(poller.cursor(), START);
        let last = poller.last_error().unwrap();
        assert_eq!(last.kind, ErrorKind::ApiUnavailable);
        assert_eq!(last.message, "Ошибка доступа к API. Статус ошибки: 503");
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_cursor() {
        let mut poller = poller(vec![Err(HomeworkError::Transport("connection refused".into()))]);

        let err = poller.run_cycle().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(poller.cursor(), START);
    }

    #[tokio::test]
    async fn test_unknown_status_is_reported_once() {
        let mut poller = poller(vec![Ok(homework("archived")), Ok(homework("archived"))]);

        poller.tick().await;
        poller.tick().await;

        assert_eq!(
            poller.notifier().sent(),
            vec!["Непредусмотренный статус поля status в объекте homework: archived"]
        );
        assert_eq!(poller.cursor(), START);
        assert_eq!(poller.source().calls(), vec![START, START]);
    }

    #[tokio::test]
    async fn test_different_error_is_reported_again() {
        let mut poller = poller(vec![
            Ok(homework("archived")),
            Ok(json!({"homeworks": "broken", "current_date": 1})),
            Ok(homework("archived")),
        ]);

        poller.tick().await;
        poller.tick().await;
        poller.tick().await;

        assert_eq!(
            poller.notifier().sent(),
            vec![
                "Непредусмотренный статус поля status в объекте homework: archived",
                "Объект homeworks в ответе от API - не список.",
                "Непредусмотренный статус поля status в объекте homework: archived",
            ]
        );
    }

    #[tokio::test]
    async fn test_last_error_survives_successful_cycle() {
        let mut poller = poller(vec![
            Ok(homework("archived")),
            Ok(json!({"homeworks": [], "current_date": 1700000000})),
            Ok(homework("archived")),
        ]);

        poller.tick().await;
        poller.tick().await;
        poller.tick().await;

        assert_eq!(poller.notifier().sent().len(), 1);
        assert_eq!(poller.cursor(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_missing_name_is_reported() {
        let mut poller = poller(vec![Ok(json!({
            "homeworks": [{"status": "approved"}],
            "current_date": 1700000000
        }))]);

        poller.tick().await;

        assert_eq!(
            poller.notifier().sent(),
            vec!["В словаре homeworks нет ключа homework_name."]
        );
        assert_eq!(poller.cursor(), START);
    }

    #[tokio::test]
    async fn test_failed_status_delivery_is_retried_next_cycle() {
        let mut poller = HomeworkPoller::with_cursor(
            MockSource::with(vec![Ok(homework("rejected")), Ok(homework("rejected"))]),
            MockNotifier::failing(1),
            START,
            RETRY,
        );

        let err = poller.run_cycle().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Delivery);
        assert_eq!(poller.cursor(), START);
        assert!(poller.notifier().sent().is_empty());

        poller.tick().await;

        assert_eq!(
            poller.notifier().sent(),
            vec!["Изменился статус проверки работы \"diploma\". Работа проверена: у ревьюера есть замечания."]
        );
        assert_eq!(poller.cursor(), 1_700_000_000);
        assert_eq!(poller.source().calls(), vec![START, START]);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_logged_not_reported() {
        let mut poller = HomeworkPoller::with_cursor(
            MockSource::with(vec![Ok(homework("approved"))]),
            MockNotifier::failing(1),
            START,
            RETRY,
        );

        poller.tick().await;

        assert!(poller.notifier().sent().is_empty());
        assert_eq!(poller.cursor(), START);
        assert_eq!(poller.last_error().unwrap().kind, ErrorKind::Delivery);
    }

    #[tokio::test]
    async fn test_only_first_homework_is_inspected() {
        let mut poller = poller(vec![Ok(json!({
            "homeworks": [
                {"homework_name": "diploma", "status": "reviewing"},
                {"homework_name": "older", "status": "archived"}
            ],
            "current_date": 1700000000
        }))]);

        poller.tick().await;

        assert_eq!(
            poller.notifier().sent(),
            vec!["Изменился статус проверки работы \"diploma\". Работа взята на проверку ревьюером."]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sleeps_between_cycles() {
        let mut poller = poller(vec![
            Err(HomeworkError::ApiUnavailable(500)),
            Ok(json!({"homeworks": [], "current_date": 1699000600})),
        ]);

        // Cycles start at t=0, 600 and 1200.
        let result = tokio::time::timeout(Duration::from_secs(1250), poller.run()).await;

        assert!(result.is_err(), "run never returns");
        assert_eq!(
            poller.source().calls(),
            vec![START, START, 1_699_000_600]
        );
        assert_eq!(poller.cursor(), 1_699_000_600);
    }
}
