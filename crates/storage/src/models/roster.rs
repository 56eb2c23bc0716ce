use std::collections::BTreeSet;

use uuid::Uuid;

use crate::error::{Result, StorageError};

/// Outcome of a successful admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Added,
    AlreadyRegistered,
}

/// The participant set of one schedule together with its capacity.
///
/// `admit` performs the capacity check and the insertion as one step on a
/// value the caller holds exclusively: the repository builds a roster under
/// a `FOR UPDATE` row lock, in-process callers keep it behind a mutex.
#[derive(Debug, Clone)]
pub struct Roster {
    schedule_id: Uuid,
    max_participants: i32,
    members: BTreeSet<Uuid>,
}

impl Roster {
    pub fn new(
        schedule_id: Uuid,
        max_participants: i32,
        members: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        Self {
            schedule_id,
            max_participants,
            members: members.into_iter().collect(),
        }
    }

    pub fn max_participants(&self) -> i32 {
        self.max_participants
    }

    /// True when an unchecked replacement left more members than seats.
    pub fn is_over_capacity(&self) -> bool {
        usize::try_from(self.max_participants)
            .map(|max| self.members.len() > max)
            .unwrap_or(!self.members.is_empty())
    }

    pub fn participant_count(&self) -> usize {
        self.members.len()
    }

    pub fn can_register(&self) -> bool {
        // A non-positive capacity admits nobody.
        usize::try_from(self.max_participants)
            .map(|max| self.members.len() < max)
            .unwrap_or(false)
    }

    pub fn contains(&self, member_id: Uuid) -> bool {
        self.members.contains(&member_id)
    }

    pub fn admit(&mut self, member_id: Uuid) -> Result<Admission> {
        if self.members.contains(&member_id) {
            return Ok(Admission::AlreadyRegistered);
        }

        if !self.can_register() {
            return Err(StorageError::ScheduleFull {
                schedule_id: self.schedule_id,
                max_participants: self.max_participants,
            });
        }

        self.members.insert(member_id);
        Ok(Admission::Added)
    }

    /// Changes the capacity. Fails when current participants would no
    /// longer fit.
    pub fn resize(&mut self, max_participants: i32) -> Result<()> {
        let fits = usize::try_from(max_participants)
            .map(|max| self.members.len() <= max)
            .unwrap_or(false);

        if !fits {
            return Err(StorageError::validation(format!(
                "max_participants cannot be lower than the {} registered participants",
                self.members.len()
            )));
        }

        self.max_participants = max_participants;
        Ok(())
    }

    /// Swaps in a whole participant set without looking at capacity.
    /// Only administrative setup of group classes goes through here.
    pub fn replace_unchecked(&mut self, members: impl IntoIterator<Item = Uuid>) {
        self.members = members.into_iter().collect();
    }

    pub fn members(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.members.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;

    #[test]
    fn test_admit_until_full() {
        let mut roster = Roster::new(Uuid::new_v4(), 2, []);
        assert_eq!(roster.admit(Uuid::new_v4()).unwrap(), Admission::Added);
        assert_eq!(roster.admit(Uuid::new_v4()).unwrap(), Admission::Added);
        assert!(!roster.can_register());

        let before: Vec<Uuid> = roster.members().collect();
        let err = roster.admit(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StorageError::ScheduleFull { max_participants: 2, .. }));
        assert_eq!(roster.members().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_admit_is_idempotent() {
        let member = Uuid::new_v4();
        let mut roster = Roster::new(Uuid::new_v4(), 3, []);
        assert_eq!(roster.admit(member).unwrap(), Admission::Added);
        assert_eq!(roster.admit(member).unwrap(), Admission::AlreadyRegistered);
        assert_eq!(roster.participant_count(), 1);
    }

    #[test]
    fn test_existing_participant_on_full_schedule_is_a_no_op() {
        let member = Uuid::new_v4();
        let mut roster = Roster::new(Uuid::new_v4(), 1, [member]);
        assert_eq!(roster.admit(member).unwrap(), Admission::AlreadyRegistered);
        assert_eq!(roster.participant_count(), 1);
    }

    #[test]
    fn test_replace_unchecked_ignores_capacity() {
        let mut roster = Roster::new(Uuid::new_v4(), 1, []);
        roster.replace_unchecked([Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()]);
        assert_eq!(roster.participant_count(), 3);
        assert!(!roster.can_register());
        assert!(roster.is_over_capacity());
    }

    #[test]
    fn test_resize_keeps_registered_participants() {
        let mut roster = Roster::new(Uuid::new_v4(), 4, [Uuid::new_v4(), Uuid::new_v4()]);
        roster.resize(2).unwrap();
        assert_eq!(roster.max_participants(), 2);
        assert!(!roster.can_register());

        let err = roster.resize(1).unwrap_err();
        assert!(matches!(err, StorageError::Validation(_)));
        assert_eq!(roster.max_participants(), 2);
    }

    #[test]
    fn test_zero_capacity_admits_nobody() {
        let mut roster = Roster::new(Uuid::new_v4(), 0, []);
        assert!(roster.admit(Uuid::new_v4()).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_registrations_for_last_seat() {
        let schedule_id = Uuid::new_v4();
        let roster = Arc::new(Mutex::new(Roster::new(schedule_id, 2, [Uuid::new_v4()])));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let roster = Arc::clone(&roster);
                tokio::spawn(async move { roster.lock().await.admit(Uuid::new_v4()) })
            })
            .collect();

        let mut added = 0;
        let mut full = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(Admission::Added) => added += 1,
                Err(StorageError::ScheduleFull { .. }) => full += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }

        assert_eq!((added, full), (1, 1));
        assert_eq!(roster.lock().await.participant_count(), 2);
    }
}
