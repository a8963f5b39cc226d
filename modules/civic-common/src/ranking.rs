use crate::types::Complaint;

/// Order complaints by priority score (descending), breaking ties by
/// recency (newest first). Every listing surface — plain, filtered, and
/// geo-bounded — goes through this one ordering.
pub fn rank(complaints: &mut [Complaint]) {
    complaints.sort_by(|a, b| {
        b.priority_score()
            .cmp(&a.priority_score())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}
