use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::Deserialize;

static BANK_DIR: Dir = include_dir!("src/bank");

/// A gradeable unit identified by a stable id, belonging to one chapter.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub chapter_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

/// The static course ordering. Declaration order of the flattened lesson
/// list defines the prerequisite chain, crossing chapter boundaries.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Curriculum {
    chapters: Vec<Chapter>,
}

impl Curriculum {
    /// The curriculum shipped with the binary. Bad embedded JSON is a
    /// build artifact problem, so this panics rather than propagating.
    pub fn bundled() -> Self {
        let file = BANK_DIR
            .get_file("curriculum.json")
            .expect("curriculum file not found");
        let contents = file
            .contents_utf8()
            .expect("unable to interpret curriculum file as a string");
        serde_json::from_str(contents).expect("unable to deserialize curriculum json")
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Lessons in prerequisite order.
    pub fn flattened(&self) -> impl Iterator<Item = &Lesson> {
        self.chapters.iter().flat_map(|c| c.lessons.iter())
    }

    pub fn first(&self) -> Option<&Lesson> {
        self.flattened().next()
    }

    pub fn find(&self, lesson_id: &str) -> Option<&Lesson> {
        self.flattened().find(|l| l.id == lesson_id)
    }

    /// The immediate predecessor in flattened order; `None` for the first
    /// lesson and for ids the curriculum does not know.
    pub fn predecessor_of(&self, lesson_id: &str) -> Option<&Lesson> {
        self.flattened()
            .tuple_windows()
            .find(|(_, lesson)| lesson.id == lesson_id)
            .map(|(prev, _)| prev)
    }

    /// The lesson after the given one, for "next lesson" navigation once a
    /// lesson is passed.
    pub fn next_after(&self, lesson_id: &str) -> Option<&Lesson> {
        self.flattened()
            .tuple_windows()
            .find(|(lesson, _)| lesson.id == lesson_id)
            .map(|(_, next)| next)
    }

    pub fn lesson_count(&self) -> usize {
        self.chapters.iter().map(|c| c.lessons.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_curriculum_loads() {
        let curriculum = Curriculum::bundled();
        assert_eq!(curriculum.chapters().len(), 10);
        assert!(curriculum.lesson_count() > 40);
    }

    #[test]
    fn first_lesson_is_l1_1() {
        let curriculum = Curriculum::bundled();
        assert_eq!(curriculum.first().unwrap().id, "l1.1");
    }

    #[test]
    fn lesson_ids_are_unique() {
        let curriculum = Curriculum::bundled();
        let ids: Vec<_> = curriculum.flattened().map(|l| l.id.as_str()).collect();
        assert_eq!(ids.len(), ids.iter().unique().count());
    }

    #[test]
    fn predecessor_follows_declaration_order() {
        let curriculum = Curriculum::bundled();
        assert_eq!(curriculum.predecessor_of("l1.1"), None);
        assert_eq!(curriculum.predecessor_of("l1.2").unwrap().id, "l1.1");
    }

    #[test]
    fn predecessor_crosses_chapter_boundaries() {
        let curriculum = Curriculum::bundled();
        // The first lesson of chapter II follows the chapter I review.
        assert_eq!(curriculum.predecessor_of("l2.5").unwrap().id, "l1.final");
    }

    #[test]
    fn unknown_lesson_has_no_predecessor() {
        let curriculum = Curriculum::bundled();
        assert_eq!(curriculum.predecessor_of("nope"), None);
        assert_eq!(curriculum.find("nope"), None);
    }

    #[test]
    fn next_after_walks_forward() {
        let curriculum = Curriculum::bundled();
        assert_eq!(curriculum.next_after("l1.1").unwrap().id, "l1.2");
        assert_eq!(curriculum.next_after("l1.final").unwrap().id, "l2.5");
        assert_eq!(curriculum.next_after("l10.final"), None);
    }

    #[test]
    fn lessons_carry_their_chapter_id() {
        let curriculum = Curriculum::bundled();
        for chapter in curriculum.chapters() {
            for lesson in &chapter.lessons {
                assert_eq!(lesson.chapter_id, chapter.id);
            }
        }
    }
}
