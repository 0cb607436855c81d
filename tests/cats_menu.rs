use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;
use cattask::CatStoreError;
use cattask::cats::{Cat, CatStore, IoConsole, run_menu, seed_sample_data};

/// In-memory `CatStore` with the same unique-name rule as the real collection.
#[derive(Default)]
struct MemoryStore {
    cats: Mutex<Vec<Cat>>,
    unreachable: bool,
}

impl MemoryStore {
    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    fn names(&self) -> Vec<String> {
        self.cats.lock().unwrap().iter().map(|c| c.name.clone()).collect()
    }

    fn get(&self, name: &str) -> Option<Cat> {
        self.cats.lock().unwrap().iter().find(|c| c.name == name).cloned()
    }
}

#[async_trait]
impl CatStore for MemoryStore {
    async fn list_all(&self) -> Vec<Cat> {
        self.cats.lock().unwrap().clone()
    }

    async fn find_by_name(&self, name: &str) -> Option<Cat> {
        self.get(name)
    }

    async fn update_age(&self, name: &str, age: i32) -> bool {
        let mut cats = self.cats.lock().unwrap();
        match cats.iter_mut().find(|c| c.name == name) {
            Some(cat) if cat.age != age => {
                cat.age = age;
                true
            }
            _ => false,
        }
    }

    async fn add_feature(&self, name: &str, feature: &str) -> bool {
        let mut cats = self.cats.lock().unwrap();
        cats.iter_mut()
            .find(|c| c.name == name)
            .is_some_and(|cat| cat.add_feature(feature))
    }

    async fn delete_by_name(&self, name: &str) -> bool {
        let mut cats = self.cats.lock().unwrap();
        let before = cats.len();
        cats.retain(|c| c.name != name);
        cats.len() < before
    }

    async fn delete_all(&self) -> u64 {
        let mut cats = self.cats.lock().unwrap();
        let removed = cats.len() as u64;
        cats.clear();
        removed
    }

    async fn estimated_count(&self) -> Result<u64, CatStoreError> {
        if self.unreachable {
            return Err(CatStoreError::Other("server unreachable".into()));
        }
        Ok(self.cats.lock().unwrap().len() as u64)
    }

    async fn insert_one(&self, cat: Cat) -> Result<(), CatStoreError> {
        let mut cats = self.cats.lock().unwrap();
        if cats.iter().any(|c| c.name == cat.name) {
            return Err(CatStoreError::DuplicateKey(cat.name));
        }
        cats.push(cat);
        Ok(())
    }

    async fn insert_many(&self, batch: Vec<Cat>) -> Result<usize, CatStoreError> {
        let mut inserted = 0;
        let mut duplicate = None;
        for cat in batch {
            match self.insert_one(cat).await {
                Ok(()) => inserted += 1,
                Err(err) => duplicate = Some(err),
            }
        }
        match duplicate {
            Some(err) => Err(err),
            None => Ok(inserted),
        }
    }
}

async fn drive(store: &MemoryStore, input: &str) -> String {
    let mut console = IoConsole::new(Cursor::new(input.to_string()), Vec::new());
    run_menu(store, &mut console).await.unwrap();
    String::from_utf8(console.into_output()).unwrap()
}

#[tokio::test]
async fn seeded_walkthrough_find_update_delete() {
    let store = MemoryStore::default();
    let output = drive(
        &store,
        "2\nbarsik\n3\nbarsik\n4\n2\nbarsik\n5\nLama\n1\n7\n",
    )
    .await;

    assert!(output.contains("barsik (age=3)"));
    assert!(output.contains("Updated."));
    assert!(output.contains("barsik (age=4)"));
    assert!(output.contains("Deleted."));
    assert_eq!(store.names(), ["barsik", "Liza"]);
    assert_eq!(output.matches("• ").count(), 2);
    assert!(output.trim_end().ends_with("Bye!"));
}

#[tokio::test]
async fn menu_lists_seven_choices() {
    let store = MemoryStore::default();
    let output = drive(&store, "7\n").await;
    for line in [
        "=== Mongo Cats CRUD ===",
        "1. List all cats",
        "2. Find cat by name",
        "3. Update cat age by name",
        "4. Add feature to cat by name",
        "5. Delete cat by name",
        "6. Delete ALL cats",
        "7. Exit",
    ] {
        assert!(output.contains(line), "missing `{line}` in {output}");
    }
}

#[tokio::test]
async fn malformed_age_is_rejected_without_update() {
    let store = MemoryStore::default();
    let output = drive(&store, "3\nbarsik\nfour\n7\n").await;
    assert!(output.contains("Age must be an integer."));
    assert!(!output.contains("Updated."));
    assert_eq!(store.get("barsik").unwrap().age, 3);
}

#[tokio::test]
async fn update_of_unknown_name_reports_nothing_updated() {
    let store = MemoryStore::default();
    let output = drive(&store, "3\nTom\n5\n7\n").await;
    assert!(output.contains("Nothing updated (check name)."));
}

#[tokio::test]
async fn feature_added_once() {
    let store = MemoryStore::default();
    let output = drive(&store, "4\nLiza\nsleepy\n4\nLiza\nsleepy\n7\n").await;
    assert_eq!(output.matches("Feature added.").count(), 1);
    assert_eq!(output.matches("Nothing updated (check name).").count(), 1);
    let features = store.get("Liza").unwrap().features;
    assert_eq!(features.iter().filter(|f| *f == "sleepy").count(), 1);
}

#[tokio::test]
async fn delete_all_needs_literal_yes() {
    let store = MemoryStore::default();
    let output = drive(&store, "6\nyes\n6\nYES\n1\n7\n").await;
    assert!(output.contains("Cancelled."));
    assert!(output.contains("Deleted 3 document(s)."));
    assert!(output.contains("No cats found."));
    assert!(store.names().is_empty());
}

#[tokio::test]
async fn unknown_choice_keeps_looping() {
    let store = MemoryStore::default();
    let output = drive(&store, "9\n\nabc\n7\n").await;
    assert_eq!(output.matches("Unknown choice, try again.").count(), 3);
    assert!(output.contains("Bye!"));
}

#[tokio::test]
async fn end_of_input_exits_the_loop() {
    let store = MemoryStore::default();
    let output = drive(&store, "1\n").await;
    assert!(output.contains("• barsik"));
    assert!(output.trim_end().ends_with("Bye!"));
}

#[tokio::test]
async fn find_missing_cat() {
    let store = MemoryStore::default();
    let output = drive(&store, "2\nGarfield\n7\n").await;
    assert!(output.contains("Cat not found."));
}

#[tokio::test]
async fn seeding_only_fills_an_empty_collection() {
    let store = MemoryStore::default();
    assert_eq!(seed_sample_data(&store).await, 3);
    assert_eq!(seed_sample_data(&store).await, 0);
    assert_eq!(store.names(), ["barsik", "Lama", "Liza"]);

    let populated = MemoryStore::default();
    populated
        .insert_one(Cat::new("Tom", 5, ["grey"]))
        .await
        .unwrap();
    assert_eq!(seed_sample_data(&populated).await, 0);
    assert_eq!(populated.names(), ["Tom"]);
}

#[tokio::test]
async fn seeding_failure_is_not_fatal() {
    let store = MemoryStore::unreachable();
    assert_eq!(seed_sample_data(&store).await, 0);
    let output = drive(&store, "1\n7\n").await;
    assert!(output.contains("No cats found."));
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let store = MemoryStore::default();
    seed_sample_data(&store).await;
    let err = store
        .insert_one(Cat::new("barsik", 9, Vec::<String>::new()))
        .await
        .unwrap_err();
    assert!(err.is_duplicate_key());
    assert_eq!(store.get("barsik").unwrap().age, 3);
}
