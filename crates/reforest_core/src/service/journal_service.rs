//! Journal use-case service.
//!
//! # Responsibility
//! - Own the category list and profile for one user.
//! - Persist every accepted mutation through a `KeyValueStore`.
//!
//! # Invariants
//! - Category titles are non-blank after trim.
//! - A failed lookup or save leaves both memory and store untouched.
//! - Answer edits keep node ids of unchanged lines.

use crate::model::journal::{Category, CategoryId, Content, ContentId, Profile};
use crate::outline::{reparse_preserving_ids, serialize_marked};
use crate::repo::kv_store::{
    load_object, save_object, KeyValueStore, KvWrite, StorageKey, StoreError,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type JournalResult<T> = Result<T, JournalError>;

/// Errors from journal service operations.
#[derive(Debug)]
pub enum JournalError {
    /// No category with this id.
    CategoryNotFound(CategoryId),
    /// No content with this id in the addressed scope.
    ContentNotFound(ContentId),
    /// Category title is blank after trim.
    InvalidTitle,
    /// Category position is outside the list.
    IndexOutOfRange { index: usize, len: usize },
    /// Persistence failure.
    Store(StoreError),
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ContentNotFound(id) => write!(f, "content not found: {id}"),
            Self::InvalidTitle => write!(f, "category title must not be blank"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "category index {index} out of range for {len} categories")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for JournalError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Journal facade over a key-value store.
pub struct JournalService<S: KeyValueStore> {
    store: S,
    categories: Vec<Category>,
    profile: Profile,
}

impl<S: KeyValueStore> JournalService<S> {
    /// Loads categories and profile from `store`; missing keys yield an
    /// empty journal.
    pub fn load(store: S) -> JournalResult<Self> {
        let categories: Vec<Category> =
            load_object(&store, StorageKey::MeCategoryModelList)?.unwrap_or_default();
        let profile = load_profile(&store)?;
        info!(
            "event=journal_load module=service status=ok categories={} contents={}",
            categories.len(),
            categories
                .iter()
                .map(|category| category.content_list.len())
                .sum::<usize>()
        );
        Ok(Self {
            store,
            categories,
            profile,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Appends a new empty category.
    pub fn add_category(&mut self, title: impl Into<String>) -> JournalResult<CategoryId> {
        let category = Category::new(normalize_title(title.into())?);
        let id = category.id;
        self.update_categories(|categories| {
            categories.push(category);
            Ok(())
        })?;
        info!("event=category_add module=service status=ok category_id={id}");
        Ok(id)
    }

    pub fn rename_category(
        &mut self,
        id: CategoryId,
        title: impl Into<String>,
    ) -> JournalResult<()> {
        let title = normalize_title(title.into())?;
        self.update_categories(|categories| {
            category_in(categories, id)?.title = title;
            Ok(())
        })
    }

    /// Removes a category with all of its contents.
    pub fn remove_category(&mut self, id: CategoryId) -> JournalResult<Category> {
        let index = self.category_index(id)?;
        let removed = self.update_categories(|categories| Ok(categories.remove(index)))?;
        info!(
            "event=category_remove module=service status=ok category_id={id} contents={}",
            removed.content_list.len()
        );
        Ok(removed)
    }

    /// Moves the category at `from` so that it ends up at position `to`.
    pub fn move_category(&mut self, from: usize, to: usize) -> JournalResult<()> {
        let len = self.categories.len();
        for index in [from, to] {
            if index >= len {
                return Err(JournalError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        self.update_categories(|categories| {
            let category = categories.remove(from);
            categories.insert(to, category);
            Ok(())
        })
    }

    /// Appends `content` to the end of a category.
    pub fn add_content(
        &mut self,
        category_id: CategoryId,
        content: Content,
    ) -> JournalResult<ContentId> {
        let id = content.id;
        self.update_categories(|categories| {
            category_in(categories, category_id)?.content_list.push(content);
            Ok(())
        })?;
        info!(
            "event=content_add module=service status=ok category_id={category_id} content_id={id}"
        );
        Ok(id)
    }

    /// Replaces headline and answer of the content with `content.id`.
    pub fn update_content(
        &mut self,
        category_id: CategoryId,
        content: Content,
    ) -> JournalResult<()> {
        self.update_categories(|categories| {
            let slot = content_in(categories, category_id, content.id)?;
            *slot = content;
            Ok(())
        })
    }

    /// Removes the content from whichever category holds it.
    pub fn remove_content(&mut self, content_id: ContentId) -> JournalResult<Content> {
        let removed = self.update_categories(|categories| {
            categories
                .iter_mut()
                .find_map(|category| {
                    let index = category
                        .content_list
                        .iter()
                        .position(|content| content.id == content_id)?;
                    Some(category.content_list.remove(index))
                })
                .ok_or(JournalError::ContentNotFound(content_id))
        })?;
        info!("event=content_remove module=service status=ok content_id={content_id}");
        Ok(removed)
    }

    /// Finds a content in any category, with the owning category id.
    pub fn find_content(&self, content_id: ContentId) -> Option<(CategoryId, &Content)> {
        self.categories.iter().find_map(|category| {
            category
                .content_list
                .iter()
                .find(|content| content.id == content_id)
                .map(|content| (category.id, content))
        })
    }

    /// Answer of one content as marked editor text.
    pub fn answer_text(
        &self,
        category_id: CategoryId,
        content_id: ContentId,
    ) -> JournalResult<String> {
        let content = self.content(category_id, content_id)?;
        Ok(serialize_marked(content.sub_lines.roots()))
    }

    /// Replaces an answer from marked editor text.
    ///
    /// Lines whose text is unchanged keep their node ids.
    pub fn edit_answer(
        &mut self,
        category_id: CategoryId,
        content_id: ContentId,
        text: &str,
    ) -> JournalResult<&Content> {
        let lines = self.update_categories(|categories| {
            let content = content_in(categories, category_id, content_id)?;
            content.sub_lines = reparse_preserving_ids(&content.sub_lines, text);
            Ok(content.sub_lines.len())
        })?;
        info!(
            "event=answer_edit module=service status=ok content_id={content_id} lines={lines}"
        );
        self.content(category_id, content_id)
    }

    /// Stores the profile field by field and drops the legacy record.
    ///
    /// All keys are written in one batch; on error neither the store nor
    /// the loaded profile changes.
    pub fn save_profile(&mut self, profile: Profile) -> JournalResult<()> {
        let image = match &profile.profile_image {
            Some(bytes) => KvWrite::Put(StorageKey::ProfileImage, bytes.clone()),
            None => KvWrite::Remove(StorageKey::ProfileImage),
        };
        let writes = [
            KvWrite::encode(StorageKey::ProfileName, &profile.name)?,
            KvWrite::encode(StorageKey::ProfileValue, &profile.statement)?,
            image,
            KvWrite::Remove(StorageKey::Profile),
        ];
        self.store.apply_batch(&writes)?;
        info!(
            "event=profile_save module=service status=ok has_image={}",
            profile.profile_image.is_some()
        );
        self.profile = profile;
        Ok(())
    }

    /// Applies `edit` to a copy of the categories, persists the copy and only
    /// then makes it current.
    fn update_categories<T>(
        &mut self,
        edit: impl FnOnce(&mut Vec<Category>) -> JournalResult<T>,
    ) -> JournalResult<T> {
        let mut next = self.categories.clone();
        let output = edit(&mut next)?;
        save_object(&self.store, StorageKey::MeCategoryModelList, &next)?;
        self.categories = next;
        Ok(output)
    }

    fn category_index(&self, id: CategoryId) -> JournalResult<usize> {
        self.categories
            .iter()
            .position(|category| category.id == id)
            .ok_or(JournalError::CategoryNotFound(id))
    }

    fn content(&self, category_id: CategoryId, content_id: ContentId) -> JournalResult<&Content> {
        self.category(category_id)
            .ok_or(JournalError::CategoryNotFound(category_id))?
            .content_list
            .iter()
            .find(|content| content.id == content_id)
            .ok_or(JournalError::ContentNotFound(content_id))
    }
}

fn category_in(categories: &mut [Category], id: CategoryId) -> JournalResult<&mut Category> {
    categories
        .iter_mut()
        .find(|category| category.id == id)
        .ok_or(JournalError::CategoryNotFound(id))
}

fn content_in(
    categories: &mut [Category],
    category_id: CategoryId,
    content_id: ContentId,
) -> JournalResult<&mut Content> {
    category_in(categories, category_id)?
        .content_list
        .iter_mut()
        .find(|content| content.id == content_id)
        .ok_or(JournalError::ContentNotFound(content_id))
}

/// Reads the per-field profile keys, falling back to the legacy record.
fn load_profile<S: KeyValueStore>(store: &S) -> JournalResult<Profile> {
    let name: Option<String> = load_object(store, StorageKey::ProfileName)?;
    let statement: Option<String> = load_object(store, StorageKey::ProfileValue)?;
    let profile_image = store.get(StorageKey::ProfileImage)?;

    if name.is_none() && statement.is_none() && profile_image.is_none() {
        let legacy: Option<Profile> = load_object(store, StorageKey::Profile)?;
        return Ok(legacy.unwrap_or_default());
    }

    Ok(Profile {
        name: name.unwrap_or_default(),
        statement: statement.unwrap_or_default(),
        profile_image,
    })
}

fn normalize_title(title: String) -> JournalResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(JournalError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}
