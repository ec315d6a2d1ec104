use crate::{ConsoleError, ParameterSet, Platform};

/// Allowed drift of `first + second` away from 1.0.
pub const LINK_TOLERANCE: f64 = 1e-9;

/// Two parameters whose values always sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedPair {
    pub id: &'static str,
    pub first: &'static str,
    pub second: &'static str,
}

impl LinkedPair {
    pub fn partner_of(&self, member: &str) -> Option<&'static str> {
        if member == self.first {
            Some(self.second)
        } else if member == self.second {
            Some(self.first)
        } else {
            None
        }
    }

    pub fn contains(&self, member: &str) -> bool {
        self.partner_of(member).is_some()
    }
}

const YOUTUBE_PAIRS: &[LinkedPair] = &[LinkedPair {
    id: "engagement_weights",
    first: "like_weight",
    second: "comment_weight",
}];

pub fn linked_pairs(platform: Platform) -> &'static [LinkedPair] {
    match platform {
        Platform::YouTube => YOUTUBE_PAIRS,
        Platform::GitHub => &[],
    }
}

pub fn pair_by_id(platform: Platform, id: &str) -> Option<&'static LinkedPair> {
    linked_pairs(platform).iter().find(|pair| pair.id == id)
}

/// The pair a parameter belongs to, if any.
pub fn pair_of(platform: Platform, member: &str) -> Option<&'static LinkedPair> {
    linked_pairs(platform).iter().find(|pair| pair.contains(member))
}

/// Both values written by one [`ParameterSet::set_linked`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkedUpdate {
    pub member: &'static str,
    pub value: f64,
    pub partner: &'static str,
    pub partner_value: f64,
}

/// Clamp a weight and compute its complement.
pub fn complement(raw: f64) -> (f64, f64) {
    let value = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };
    (value, 1.0 - value)
}

impl ParameterSet {
    /// Set one member of a linked pair; the partner becomes `1 - value`.
    ///
    /// Both members are written in one call, so no caller can observe a
    /// half-applied pair.
    pub fn set_linked(
        &mut self,
        pair_id: &str,
        member: &str,
        raw: f64,
    ) -> Result<LinkedUpdate, ConsoleError> {
        let pair = pair_by_id(self.platform(), pair_id)
            .ok_or_else(|| ConsoleError::UnknownLinkedPair(pair_id.to_string()))?;
        let (member, partner) = if member == pair.first {
            (pair.first, pair.second)
        } else if member == pair.second {
            (pair.second, pair.first)
        } else {
            return Err(ConsoleError::UnknownLinkedPair(format!("{pair_id}.{member}")));
        };

        let (value, partner_value) = complement(raw);
        self.write_pair((member, value), (partner, partner_value));
        Ok(LinkedUpdate {
            member,
            value,
            partner,
            partner_value,
        })
    }

    /// True if every linked pair of this platform sums to one.
    pub fn links_hold(&self) -> bool {
        linked_pairs(self.platform()).iter().all(|pair| {
            match (self.get(pair.first), self.get(pair.second)) {
                (Some(a), Some(b)) => (a + b - 1.0).abs() <= LINK_TOLERANCE,
                _ => false,
            }
        })
    }

    /// Re-establish broken pairs from their first member.
    pub(crate) fn repair_links(&mut self) {
        for pair in linked_pairs(self.platform()) {
            let first = self.get(pair.first).unwrap_or(0.0);
            let second = self.get(pair.second).unwrap_or(0.0);
            if (first + second - 1.0).abs() > LINK_TOLERANCE {
                let (value, partner_value) = complement(first);
                self.write_pair((pair.first, value), (pair.second, partner_value));
            }
        }
    }
}
