use crate::models::{BloodType, CompatibilityRule};

/// Check whether a donor can give blood to a recipient under the given rule
///
/// `Exact` only accepts the same blood type. `AboRh` applies red-cell
/// transfusion rules: the donor must not carry an ABO antigen the recipient
/// lacks, and Rh+ blood never goes to an Rh- recipient.
#[inline]
pub fn is_compatible(rule: CompatibilityRule, donor: BloodType, recipient: BloodType) -> bool {
    match rule {
        CompatibilityRule::Exact => donor == recipient,
        CompatibilityRule::AboRh => {
            if donor.has_a_antigen() && !recipient.has_a_antigen() {
                return false;
            }
            if donor.has_b_antigen() && !recipient.has_b_antigen() {
                return false;
            }
            !(donor.is_rh_positive() && !recipient.is_rh_positive())
        }
    }
}

/// All donor blood types acceptable for a recipient under the given rule
pub fn compatible_donor_types(rule: CompatibilityRule, recipient: BloodType) -> Vec<BloodType> {
    BloodType::ALL
        .iter()
        .copied()
        .filter(|donor| is_compatible(rule, *donor, recipient))
        .collect()
}
