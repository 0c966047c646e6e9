//! Ordered modifier storage for one entity.

use super::modifier::{ActiveModifier, ModifierId, ModifierType};

/// Live modifiers of one entity, oldest first.
#[derive(Clone, Debug, Default)]
pub struct ModifierList {
    entries: Vec<ActiveModifier>,
}

impl ModifierList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, modifier: ActiveModifier) {
        debug_assert!(
            !self.contains(modifier.id),
            "{} attached twice",
            modifier.id
        );
        self.entries.push(modifier);
    }

    pub(crate) fn take(&mut self, id: ModifierId) -> Option<ActiveModifier> {
        let index = self.entries.iter().position(|m| m.id == id)?;
        Some(self.entries.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: ModifierId) -> Option<&ActiveModifier> {
        self.entries.iter().find(|m| m.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ModifierId) -> Option<&mut ActiveModifier> {
        self.entries.iter_mut().find(|m| m.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ModifierId) -> bool {
        self.entries.iter().any(|m| m.id == id)
    }

    /// The live instance of a unique type.
    #[must_use]
    pub fn find_unique(&self, modifier_type: &ModifierType) -> Option<&ActiveModifier> {
        self.entries
            .iter()
            .find(|m| m.unique && &m.modifier_type == modifier_type)
    }

    pub(crate) fn find_unique_mut(
        &mut self,
        modifier_type: &ModifierType,
    ) -> Option<&mut ActiveModifier> {
        self.entries
            .iter_mut()
            .find(|m| m.unique && &m.modifier_type == modifier_type)
    }

    pub fn of_type<'a>(
        &'a self,
        modifier_type: &'a ModifierType,
    ) -> impl Iterator<Item = &'a ActiveModifier> + 'a {
        self.entries
            .iter()
            .filter(move |m| &m.modifier_type == modifier_type)
    }

    #[must_use]
    pub fn has_type(&self, modifier_type: &str) -> bool {
        self.entries
            .iter()
            .any(|m| m.modifier_type.as_str() == modifier_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveModifier> {
        self.entries.iter()
    }

    /// Ids in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<ModifierId> {
        self.entries.iter().map(|m| m.id).collect()
    }

    /// Keywords of every modifier, in registration order, without duplicates.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for keyword in self.entries.iter().flat_map(ActiveModifier::keywords) {
            if !out.iter().any(|k| k == keyword) {
                out.push(keyword.to_owned());
            }
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{Mixin, Modifier};

    fn active(id: u32, modifier: Modifier) -> ActiveModifier {
        ActiveModifier::new(ModifierId(id), modifier)
    }

    #[test]
    fn test_order_preserved() {
        let mut list = ModifierList::new();
        list.push(active(3, Modifier::new("a")));
        list.push(active(1, Modifier::new("b")));
        list.push(active(2, Modifier::new("c")));

        assert_eq!(list.ids(), vec![ModifierId(3), ModifierId(1), ModifierId(2)]);

        let taken = list.take(ModifierId(1)).unwrap();
        assert_eq!(taken.modifier_type.as_str(), "b");
        assert_eq!(list.ids(), vec![ModifierId(3), ModifierId(2)]);
        assert!(list.take(ModifierId(1)).is_none());
    }

    #[test]
    fn test_find_unique_ignores_non_unique() {
        let mut list = ModifierList::new();
        list.push(active(1, Modifier::new("buff")));
        assert!(list.find_unique(&ModifierType::new("buff")).is_none());

        list.push(active(2, Modifier::new("buff").unique()));
        assert_eq!(
            list.find_unique(&ModifierType::new("buff")).map(|m| m.id),
            Some(ModifierId(2))
        );
        assert_eq!(list.of_type(&ModifierType::new("buff")).count(), 2);
    }

    #[test]
    fn test_keywords_deduplicated() {
        let mut list = ModifierList::new();
        list.push(active(1, Modifier::new("a").with_mixin(Mixin::keyword("Guard"))));
        list.push(active(
            2,
            Modifier::new("b")
                .with_mixin(Mixin::keyword("Guard"))
                .with_mixin(Mixin::keyword("Swift")),
        ));

        assert_eq!(list.keywords(), vec!["Guard".to_string(), "Swift".to_string()]);
    }
}
