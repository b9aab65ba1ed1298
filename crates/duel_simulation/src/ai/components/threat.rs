//! Threat detector: edge-triggered observation of the opponent's attack sources.

use bevy::prelude::*;

/// Opposing attack source (player's two strike chains)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackSource {
    Heavy,
    Light,
}

impl AttackSource {
    pub const ALL: [AttackSource; 2] = [AttackSource::Heavy, AttackSource::Light];

    fn slot(self) -> usize {
        match self {
            AttackSource::Heavy => 0,
            AttackSource::Light => 1,
        }
    }
}

/// Snapshot of one attack source at this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackSignal {
    pub source: AttackSource,
    pub attacking: bool,
    pub combo_index: usize,
}

/// Per-source memo of the last observed combo index.
///
/// `None` is the sentinel: the source was idle last time we looked, so the
/// next attack fires even if it reuses the same index.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThreatDetector {
    last_seen: [Option<usize>; 2],
}

impl ThreatDetector {
    /// Returns the sources that started a *new* attack since the last call.
    pub fn observe(&mut self, signals: &[AttackSignal]) -> Vec<AttackSource> {
        let mut started = Vec::new();

        for signal in signals {
            let memo = &mut self.last_seen[signal.source.slot()];
            if signal.attacking {
                if *memo != Some(signal.combo_index) {
                    *memo = Some(signal.combo_index);
                    started.push(signal.source);
                }
            } else {
                *memo = None;
            }
        }

        started
    }

    pub fn last_seen(&self, source: AttackSource) -> Option<usize> {
        self.last_seen[source.slot()]
    }

    pub fn reset(&mut self) {
        self.last_seen = [None; 2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(attacking: bool, combo_index: usize) -> AttackSignal {
        AttackSignal {
            source: AttackSource::Light,
            attacking,
            combo_index,
        }
    }

    #[test]
    fn test_fires_once_per_attack() {
        let mut detector = ThreatDetector::default();

        assert_eq!(detector.observe(&[light(true, 1)]), vec![AttackSource::Light]);
        for _ in 0..30 {
            assert!(detector.observe(&[light(true, 1)]).is_empty());
        }
        // Новый индекс → ровно одна реакция
        assert_eq!(detector.observe(&[light(true, 2)]), vec![AttackSource::Light]);
        assert!(detector.observe(&[light(true, 2)]).is_empty());
    }

    #[test]
    fn test_same_index_refires_after_idle() {
        let mut detector = ThreatDetector::default();
        detector.observe(&[light(true, 1)]);
        assert!(detector.observe(&[light(false, 1)]).is_empty());
        assert_eq!(detector.last_seen(AttackSource::Light), None);
        assert_eq!(detector.observe(&[light(true, 1)]), vec![AttackSource::Light]);
    }

    #[test]
    fn test_sources_tracked_independently() {
        let mut detector = ThreatDetector::default();
        let heavy = AttackSignal {
            source: AttackSource::Heavy,
            attacking: true,
            combo_index: 1,
        };
        assert_eq!(
            detector.observe(&[heavy, light(true, 1)]),
            vec![AttackSource::Heavy, AttackSource::Light]
        );
        assert!(detector.observe(&[heavy, light(false, 0)]).is_empty());
    }
}
