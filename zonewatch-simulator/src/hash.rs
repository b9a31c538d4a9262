use blake3::Hasher;
use zonewatch_core::model::{Alert, AnalysisResult};

/// BLAKE3 digest of the stored content, hex encoded.
///
/// Only content fields feed the hash. Timestamps and alert ids depend on the
/// wall clock and id source, so they are left out and two runs with the same
/// seed hash equal.
pub fn state_hash(history: &[AnalysisResult], alerts: &[Alert]) -> String {
    let mut hasher = Hasher::new();

    hasher.update(&(history.len() as u64).to_le_bytes());
    for result in history {
        hasher.update(&result.people_count().to_le_bytes());
        hasher.update(&result.vehicle_count().to_le_bytes());
        hasher.update(&[result.risk_score()]);
        update_str(&mut hasher, &result.density().to_string());
        update_str(&mut hasher, &result.flow().to_string());
        update_str(&mut hasher, result.summary());
        update_str(&mut hasher, result.prediction());
    }

    hasher.update(&(alerts.len() as u64).to_le_bytes());
    for alert in alerts {
        update_str(&mut hasher, alert.kind().as_str());
        update_str(&mut hasher, alert.severity().as_str());
        update_str(&mut hasher, alert.message());
        update_str(&mut hasher, alert.zone().as_str());
    }

    hex::encode(hasher.finalize().as_bytes())
}

fn update_str(hasher: &mut Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
