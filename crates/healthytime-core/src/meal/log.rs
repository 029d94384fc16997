//! In-memory meal record list backing the Record screen.
//!
//! Records exist for the lifetime of the process only. The list is kept
//! newest-first: every completed session is prepended.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::kind::{classify, MealType};
use crate::collab::{ImagePicker, ImageRequest, PickOutcome};
use crate::timer::{CompletedSession, SessionSink};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    /// Creation timestamp in epoch milliseconds, as a decimal string.
    pub id: String,
    /// Seconds recorded during the session.
    pub duration: u64,
    pub start_time: DateTime<FixedOffset>,
    pub stop_time: DateTime<FixedOffset>,
    pub meal_type: MealType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

impl MealRecord {
    fn from_session(id: String, session: &CompletedSession) -> Self {
        Self {
            id,
            duration: session.duration_secs,
            start_time: session.start_time,
            stop_time: session.stop_time,
            meal_type: classify(&session.stop_time),
            image_uri: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MealLog {
    records: Vec<MealRecord>,
    /// Last id handed out; ids never repeat even after deletes.
    last_id: Option<i64>,
    /// Record awaiting delete confirmation.
    pending_delete: Option<String>,
}

impl MealLog {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Records, newest first.
    pub fn records(&self) -> &[MealRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&MealRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Turn a completed session into a record and prepend it.
    pub fn record(&mut self, session: &CompletedSession) -> &MealRecord {
        let id = self.next_id(session.stop_time.timestamp_millis());
        let record = MealRecord::from_session(id, session);
        tracing::debug!(
            id = %record.id,
            duration = record.duration,
            meal_type = %record.meal_type,
            "meal recorded"
        );
        self.records.insert(0, record);
        &self.records[0]
    }

    /// Replace the meal type of a record. Returns false if nothing matched.
    pub fn set_meal_type(&mut self, id: &str, meal_type: MealType) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.meal_type = meal_type;
                true
            }
            None => false,
        }
    }

    /// Apply the result of an image selection. A cancelled pick changes nothing.
    pub fn attach_image(&mut self, id: &str, outcome: PickOutcome) -> bool {
        let PickOutcome::Picked(uri) = outcome else {
            tracing::debug!(id, "image selection cancelled");
            return false;
        };
        match self.get_mut(id) {
            Some(record) => {
                record.image_uri = Some(uri);
                true
            }
            None => false,
        }
    }

    /// Launch the picker for an existing record and attach whatever it returns.
    pub fn pick_image<P: ImagePicker + ?Sized>(
        &mut self,
        id: &str,
        picker: &mut P,
        request: &ImageRequest,
    ) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let outcome = picker.pick(request);
        self.attach_image(id, outcome)
    }

    /// First step of a delete: remember which record the user chose.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if self.get(id).is_some() {
            self.pending_delete = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Second step of a delete. Irreversible. This is the only way a record
    /// leaves the log.
    pub fn confirm_delete(&mut self) -> Option<MealRecord> {
        let id = self.pending_delete.take()?;
        self.remove(&id)
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Remove a record by id, preserving the order of the rest.
    fn remove(&mut self, id: &str) -> Option<MealRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        let removed = self.records.remove(index);
        tracing::info!(id = %removed.id, "meal record deleted");
        Some(removed)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut MealRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    fn next_id(&mut self, stamp_ms: i64) -> String {
        let id = match self.last_id {
            Some(last) if stamp_ms <= last => last + 1,
            _ => stamp_ms,
        };
        self.last_id = Some(id);
        id.to_string()
    }
}

impl SessionSink for MealLog {
    fn on_session(&mut self, session: &CompletedSession) {
        self.record(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn session(stop: &str, secs: u64) -> CompletedSession {
        CompletedSession::ending_at(at(stop), secs)
    }

    struct ScriptedPicker(Option<PickOutcome>, usize);

    impl ImagePicker for ScriptedPicker {
        fn pick(&mut self, _request: &ImageRequest) -> PickOutcome {
            self.1 += 1;
            self.0.take().unwrap_or(PickOutcome::Cancelled)
        }
    }

    #[test]
    fn breakfast_scenario() {
        let mut log = MealLog::new();
        let record = log.record(&session("2024-09-02T07:15:00+09:00", 125)).clone();
        assert_eq!(record.meal_type, MealType::Breakfast);
        assert_eq!(record.duration, 125);
        assert_eq!(record.start_time, record.stop_time - Duration::seconds(125));
        assert_eq!(record.image_uri, None);
    }

    #[test]
    fn records_are_newest_first() {
        let mut log = MealLog::new();
        log.record(&session("2024-09-02T07:15:00+09:00", 60));
        log.record(&session("2024-09-02T12:30:00+09:00", 60));
        assert_eq!(log.records()[0].meal_type, MealType::Lunch);
        assert_eq!(log.records()[1].meal_type, MealType::Breakfast);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut log = MealLog::new();
        log.record(&session("2024-09-02T07:15:00+09:00", 1));
        log.record(&session("2024-09-02T07:15:00+09:00", 2));
        log.record(&session("2024-09-02T07:14:59+09:00", 3));
        let ids: Vec<i64> = log.records().iter().map(|r| r.id.parse().unwrap()).collect();
        assert!(ids[0] > ids[1] && ids[1] > ids[2]);
    }

    #[test]
    fn set_meal_type_is_idempotent_and_ignores_unknown_ids() {
        let mut log = MealLog::new();
        let id = log.record(&session("2024-09-02T07:15:00+09:00", 10)).id.clone();
        assert!(log.set_meal_type(&id, MealType::Snack));
        let once = log.records().to_vec();
        assert!(log.set_meal_type(&id, MealType::Snack));
        assert_eq!(log.records(), once.as_slice());
        assert!(!log.set_meal_type("missing", MealType::Dinner));
        assert_eq!(log.records(), once.as_slice());
    }

    #[test]
    fn cancelled_pick_leaves_record_untouched() {
        let mut log = MealLog::new();
        let id = log.record(&session("2024-09-02T19:00:00+09:00", 10)).id.clone();
        let mut picker = ScriptedPicker(None, 0);
        assert!(!log.pick_image(&id, &mut picker, &ImageRequest::default()));
        assert_eq!(log.get(&id).unwrap().image_uri, None);

        let mut picker = ScriptedPicker(Some(PickOutcome::Picked("file:///meal.jpg".into())), 0);
        assert!(log.pick_image(&id, &mut picker, &ImageRequest::default()));
        assert_eq!(log.get(&id).unwrap().image_uri.as_deref(), Some("file:///meal.jpg"));
    }

    #[test]
    fn picker_is_not_launched_for_unknown_record() {
        let mut log = MealLog::new();
        let mut picker = ScriptedPicker(Some(PickOutcome::Picked("x".into())), 0);
        assert!(!log.pick_image("nope", &mut picker, &ImageRequest::default()));
        assert_eq!(picker.1, 0);
    }

    #[test]
    fn delete_needs_confirmation_and_keeps_order() {
        let mut log = MealLog::new();
        let a = log.record(&session("2024-09-02T07:00:00+09:00", 1)).id.clone();
        let b = log.record(&session("2024-09-02T12:00:00+09:00", 2)).id.clone();
        let c = log.record(&session("2024-09-02T19:00:00+09:00", 3)).id.clone();

        assert!(log.request_delete(&b));
        log.cancel_delete();
        assert_eq!(log.confirm_delete(), None);
        assert_eq!(log.len(), 3);

        assert!(log.request_delete(&b));
        let removed = log.confirm_delete().unwrap();
        assert_eq!(removed.id, b);
        let ids: Vec<&str> = log.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![c.as_str(), a.as_str()]);
        assert_eq!(log.pending_delete(), None);
    }

    #[test]
    fn confirm_without_request_removes_nothing() {
        let mut log = MealLog::new();
        log.record(&session("2024-09-02T07:00:00+09:00", 1));
        assert_eq!(log.confirm_delete(), None);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn request_delete_rejects_unknown_id() {
        let mut log = MealLog::new();
        assert!(!log.request_delete("42"));
        assert_eq!(log.pending_delete(), None);
    }
}
