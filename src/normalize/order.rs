//! Channel ordering: dimensions before measures

use crate::binding::{Channel, ChartBinding, ChartFieldRef};

/// Stable sort putting every dimension before every measure
pub fn sort_channel(fields: &mut [ChartFieldRef]) {
    fields.sort_by_key(|f| f.is_measure());
}

pub fn sort_axis_channels(binding: &mut ChartBinding) {
    sort_channel(binding.channel_mut(Channel::X));
    sort_channel(binding.channel_mut(Channel::Y));
}

pub fn is_ordered(fields: &[ChartFieldRef]) -> bool {
    fields
        .iter()
        .skip_while(|f| f.is_dimension())
        .all(|f| f.is_measure())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(measure: bool, i: usize) -> ChartFieldRef {
        if measure {
            ChartFieldRef::aggregate(format!("M{}", i))
        } else {
            ChartFieldRef::dimension(format!("D{}", i))
        }
    }

    #[test]
    fn test_sort_channel_is_stable() {
        let mut fields = vec![field(true, 0), field(false, 1), field(true, 2), field(false, 3)];
        sort_channel(&mut fields);
        let names: Vec<String> = fields.iter().map(|f| f.column().to_string()).collect();
        assert_eq!(names, vec!["D1", "D3", "M0", "M2"]);
        assert!(is_ordered(&fields));
    }

    #[test]
    fn test_is_ordered() {
        assert!(is_ordered(&[]));
        assert!(is_ordered(&[field(false, 0), field(true, 1)]));
        assert!(!is_ordered(&[field(true, 0), field(false, 1)]));
    }

    proptest! {
        #[test]
        fn prop_sorted_channels_group_dimensions_first(kinds in prop::collection::vec(any::<bool>(), 0..12)) {
            let mut fields: Vec<ChartFieldRef> =
                kinds.iter().enumerate().map(|(i, m)| field(*m, i)).collect();
            let dims_before: Vec<String> = fields
                .iter()
                .filter(|f| f.is_dimension())
                .map(|f| f.column().to_string())
                .collect();

            sort_channel(&mut fields);

            prop_assert!(is_ordered(&fields));
            let dims_after: Vec<String> = fields
                .iter()
                .filter(|f| f.is_dimension())
                .map(|f| f.column().to_string())
                .collect();
            prop_assert_eq!(dims_before, dims_after);
        }
    }
}
