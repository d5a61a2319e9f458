use super::*;

use shared::{
    domain::SectionLayout,
    protocol::{BulletsContent, SlideContent, DEFAULT_DOMINANT_COLOR},
};

fn slide(id: &str) -> Slide {
    Slide {
        id: SlideId::from(id),
        slide_number: 0,
        content: SlideContent::Bullets(BulletsContent::default()),
        dominant_color: DEFAULT_DOMINANT_COLOR.to_string(),
        img_url: None,
        section_layout: SectionLayout::None,
    }
}

fn deck(ids: &[&str]) -> Vec<Slide> {
    ids.iter().map(|id| slide(id)).collect()
}

fn ids(state: &SlideListState) -> Vec<String> {
    state.order().into_iter().map(|id| id.0).collect()
}

#[test]
fn load_selects_first_slide_or_nothing() {
    assert_eq!(SlideListState::new(deck(&["A", "B"])).selected(), Some(0));
    assert_eq!(SlideListState::new(Vec::new()).selected(), None);
}

#[test]
fn append_keeps_selection_and_selects_first_in_empty_list() {
    let mut state = SlideListState::new(Vec::new());
    state.append(slide("A"));
    assert_eq!(state.selected(), Some(0));

    state.select(0).expect("select");
    state.append(slide("B"));
    assert_eq!(ids(&state), vec!["A", "B"]);
    assert_eq!(state.selected(), Some(0));
}

#[test]
fn removing_an_earlier_slide_keeps_the_same_slide_selected() {
    let mut state = SlideListState::new(deck(&["A", "B", "C", "D"]));
    state.select(2).expect("select");

    let removed = state.remove(&SlideId::from("A")).expect("remove");
    assert_eq!(removed.id, SlideId::from("A"));
    assert_eq!(ids(&state), vec!["B", "C", "D"]);
    assert_eq!(state.selected_slide().map(|s| s.id.as_str()), Some("C"));
}

#[test]
fn removing_the_selected_last_slide_clamps_selection() {
    let mut state = SlideListState::new(deck(&["A", "B", "C"]));
    state.select(2).expect("select");
    state.remove(&SlideId::from("C")).expect("remove");
    assert_eq!(state.selected(), Some(1));

    state.remove(&SlideId::from("A")).expect("remove");
    state.remove(&SlideId::from("B")).expect("remove");
    assert_eq!(state.selected(), None);
    assert!(state.is_empty());
}

#[test]
fn removing_unknown_slide_is_an_error() {
    let mut state = SlideListState::new(deck(&["A"]));
    let err = state.remove(&SlideId::from("Z")).expect_err("unknown");
    assert!(matches!(err, ClientError::UnknownSlide(_)));
    assert_eq!(ids(&state), vec!["A"]);
}

#[test]
fn replace_all_follows_the_selected_slide() {
    let mut state = SlideListState::new(deck(&["A", "B", "C"]));
    state.select(1).expect("select");
    state.replace_all(deck(&["A", "X", "B", "C"]));
    assert_eq!(state.selected(), Some(2));
}

#[test]
fn replace_slide_swaps_record_in_place() {
    let mut state = SlideListState::new(deck(&["A", "B"]));
    let mut edited = slide("B");
    edited.img_url = Some("https://img.example/b.png".into());
    state.replace_slide(edited).expect("replace");

    assert_eq!(ids(&state), vec!["A", "B"]);
    assert_eq!(
        state.slides()[1].img_url.as_deref(),
        Some("https://img.example/b.png")
    );
}

#[test]
fn revision_tracks_list_changes_but_not_edits_or_selection() {
    let mut state = SlideListState::new(deck(&["A", "B", "C"]));
    let loaded = state.revision();

    state.select(2).expect("select");
    let mut edited = slide("A");
    edited.img_url = Some("https://img.example/a.png".into());
    state.replace_slide(edited).expect("replace");
    assert_eq!(state.revision(), loaded);

    state.append(slide("D"));
    state.remove(&SlideId::from("B")).expect("remove");
    state.replace_all(deck(&["A", "C"]));
    assert_eq!(state.revision(), loaded + 3);
}

#[test]
fn select_rejects_out_of_range_index() {
    let mut state = SlideListState::new(deck(&["A", "B"]));
    let err = state.select(2).expect_err("range");
    assert!(matches!(err, ClientError::IndexOutOfRange { index: 2, len: 2 }));
    assert_eq!(state.selected(), Some(0));
}

#[tokio::test]
async fn store_handles_share_one_list() {
    let store = SlideStore::new(deck(&["A", "B"]));
    let other = store.clone();
    other.lock().await.append(slide("C"));

    assert_eq!(
        store.order().await,
        vec![SlideId::from("A"), SlideId::from("B"), SlideId::from("C")]
    );
    assert_eq!(store.snapshot().await.len(), 3);
}
