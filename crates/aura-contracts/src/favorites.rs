/// Per-session favorites. Membership toggles and keeps insertion order;
/// nothing is persisted across sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: Vec<String>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles membership and returns whether the id is a favorite afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(position) = self.ids.iter().position(|item| item == id) {
            self.ids.remove(position);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|item| item == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::FavoritesSet;

    #[test]
    fn toggle_twice_restores_the_original_state() {
        let mut favorites = FavoritesSet::new();
        let before = favorites.clone();

        assert!(favorites.toggle("4"));
        assert!(favorites.contains("4"));
        assert!(!favorites.toggle("4"));
        assert_eq!(favorites, before);
    }

    #[test]
    fn favorites_keep_insertion_order() {
        let mut favorites = FavoritesSet::new();
        favorites.toggle("3");
        favorites.toggle("1");
        favorites.toggle("9");
        favorites.toggle("1");
        assert_eq!(favorites.ids(), ["3".to_string(), "9".to_string()]);
        assert_eq!(favorites.len(), 2);
    }
}
