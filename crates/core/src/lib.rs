#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod scan;
pub mod settings;
pub mod workflow;

pub mod ids {
    /// Identifier of a counting block. Seeded blocks use small ids; blocks
    /// synthesized from ad-hoc scans live in the disjoint 900 range.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct BlockId(i64);

    impl BlockId {
        pub fn new(value: i64) -> Self {
            Self(value)
        }

        pub fn get(self) -> i64 {
            self.0
        }
    }

    /// Stable synthetic identifier assigned to every item when its block is
    /// constructed. Items are addressed by this id only; display fields
    /// (name, SKU) are mutable and never used for matching.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ItemId(String);

    impl ItemId {
        pub fn compose(block: BlockId, ordinal: usize) -> Self {
            Self(format!("itm_{}_{}", block.get(), ordinal))
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, ItemIdError> {
            let value = value.into();
            validate_item_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum ItemIdError {
        MissingPrefix,
        MalformedSegments,
    }

    fn validate_item_id(value: &str) -> Result<(), ItemIdError> {
        let Some(rest) = value.strip_prefix("itm_") else {
            return Err(ItemIdError::MissingPrefix);
        };
        let mut segments = rest.split('_');
        let (Some(block), Some(ordinal), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(ItemIdError::MalformedSegments);
        };
        if block.parse::<i64>().is_err() || ordinal.parse::<usize>().is_err() {
            return Err(ItemIdError::MalformedSegments);
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn composed_ids_round_trip() {
            let id = ItemId::compose(BlockId::new(901), 2);
            assert_eq!(id.as_str(), "itm_901_2");
            assert_eq!(ItemId::try_new(id.as_str()), Ok(id));
        }

        #[test]
        fn malformed_ids_are_rejected() {
            assert_eq!(
                ItemId::try_new("block_1_2"),
                Err(ItemIdError::MissingPrefix)
            );
            assert_eq!(
                ItemId::try_new("itm_1"),
                Err(ItemIdError::MalformedSegments)
            );
            assert_eq!(
                ItemId::try_new("itm_x_2"),
                Err(ItemIdError::MalformedSegments)
            );
        }
    }
}
