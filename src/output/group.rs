//! Grouping of records by author

use crate::crawler::ProductRecord;
use std::collections::HashMap;

/// All records of one author, in merge order
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorGroup {
    pub author: String,
    pub products: Vec<ProductRecord>,
}

/// Author groups ordered by first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorGroups {
    groups: Vec<AuthorGroup>,
    index: HashMap<String, usize>,
}

impl AuthorGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to its author's group, creating the group if needed
    pub fn push(&mut self, record: ProductRecord) {
        match self.index.get(&record.author) {
            Some(&position) => self.groups[position].products.push(record),
            None => {
                self.index.insert(record.author.clone(), self.groups.len());
                self.groups.push(AuthorGroup {
                    author: record.author.clone(),
                    products: vec![record],
                });
            }
        }
    }

    pub fn get(&self, author: &str) -> Option<&AuthorGroup> {
        self.index.get(author).map(|&position| &self.groups[position])
    }

    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.author.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuthorGroup> {
        self.groups.iter()
    }

    /// Number of authors
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of records across all groups
    pub fn total_products(&self) -> usize {
        self.groups.iter().map(|group| group.products.len()).sum()
    }
}

impl<'a> IntoIterator for &'a AuthorGroups {
    type Item = &'a AuthorGroup;
    type IntoIter = std::slice::Iter<'a, AuthorGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ProductRecord> for AuthorGroups {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        let mut groups = Self::new();
        for record in iter {
            groups.push(record);
        }
        groups
    }
}

/// Groups records by author, first-seen author first
///
/// Records keep their relative order inside each group.
pub fn group_by_author(records: impl IntoIterator<Item = ProductRecord>) -> AuthorGroups {
    records.into_iter().collect()
}
