//! Tests for the query list controller.

use super::*;
use crate::error::Error;
use bubbletea_rs::{KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
struct Film {
    rank: u32,
    title: &'static str,
    year: u32,
}

impl fmt::Display for Film {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} ({})", self.rank, self.title, self.year)
    }
}

const FILMS: &[(&str, u32)] = &[
    ("The Shawshank Redemption", 1994),
    ("The Godfather", 1972),
    ("The Godfather: Part II", 1974),
    ("The Dark Knight", 2008),
    ("12 Angry Men", 1957),
    ("Schindler's List", 1993),
    ("Pulp Fiction", 1994),
    ("The Lord of the Rings: The Return of the King", 2003),
    ("The Good, the Bad and the Ugly", 1966),
    ("Fight Club", 1999),
    ("The Lord of the Rings: The Fellowship of the Ring", 2001),
    ("Star Wars: Episode V - The Empire Strikes Back", 1980),
    ("Forrest Gump", 1994),
    ("Inception", 2010),
    ("The Lord of the Rings: The Two Towers", 2002),
    ("One Flew Over the Cuckoo's Nest", 1975),
    ("Goodfellas", 1990),
    ("The Matrix", 1999),
    ("Seven Samurai", 1954),
    ("Star Wars: Episode IV - A New Hope", 1977),
    ("City of God", 2002),
    ("Se7en", 1995),
    ("The Silence of the Lambs", 1991),
    ("It's a Wonderful Life", 1946),
    ("Life Is Beautiful", 1997),
    ("The Usual Suspects", 1995),
    ("Léon: The Professional", 1994),
    ("Spirited Away", 2001),
    ("Saving Private Ryan", 1998),
    ("Once Upon a Time in the West", 1968),
    ("American History X", 1998),
    ("Interstellar", 2014),
    ("Casablanca", 1942),
    ("City Lights", 1931),
    ("Psycho", 1960),
    ("The Green Mile", 1999),
    ("The Intouchables", 2011),
    ("Modern Times", 1936),
    ("Raiders of the Lost Ark", 1981),
    ("Rear Window", 1954),
    ("The Pianist", 2002),
    ("The Departed", 2006),
    ("Terminator 2: Judgment Day", 1991),
    ("Back to the Future", 1985),
    ("Whiplash", 2014),
    ("Gladiator", 2000),
    ("Memento", 2000),
    ("The Prestige", 2006),
    ("The Lion King", 1994),
    ("Apocalypse Now", 1979),
    ("Alien", 1979),
    ("Sunset Boulevard", 1950),
    ("Dr. Strangelove", 1964),
    ("The Great Dictator", 1940),
    ("Cinema Paradiso", 1988),
    ("The Lives of Others", 2006),
    ("Grave of the Fireflies", 1988),
    ("Paths of Glory", 1957),
    ("Django Unchained", 2012),
    ("The Shining", 1980),
    ("WALL·E", 2008),
    ("American Beauty", 1999),
    ("The Dark Knight Rises", 2012),
    ("Princess Mononoke", 1997),
    ("Aliens", 1986),
    ("Oldboy", 2003),
    ("Once Upon a Time in America", 1984),
    ("Witness for the Prosecution", 1957),
    ("Das Boot", 1981),
    ("Citizen Kane", 1941),
    ("North by Northwest", 1959),
    ("Vertigo", 1958),
    ("Star Wars: Episode VI - Return of the Jedi", 1983),
    ("Reservoir Dogs", 1992),
    ("Braveheart", 1995),
    ("M", 1931),
    ("Requiem for a Dream", 2000),
    ("Amélie", 2001),
    ("A Clockwork Orange", 1971),
    ("Like Stars on Earth", 2007),
    ("Taxi Driver", 1976),
    ("Lawrence of Arabia", 1962),
    ("Double Indemnity", 1944),
    ("Eternal Sunshine of the Spotless Mind", 2004),
    ("Amadeus", 1984),
    ("To Kill a Mockingbird", 1962),
    ("Toy Story 3", 2010),
    ("Logan", 2017),
    ("Full Metal Jacket", 1987),
    ("Dangal", 2016),
    ("The Sting", 1973),
    ("2001: A Space Odyssey", 1968),
    ("Singin' in the Rain", 1952),
    ("Toy Story", 1995),
    ("Bicycle Thieves", 1948),
    ("The Kid", 1921),
    ("Inglourious Basterds", 2009),
    ("Snatch", 2000),
    ("3 Idiots", 2009),
    ("Monty Python and the Holy Grail", 1975),
];

fn films() -> Vec<Film> {
    FILMS
        .iter()
        .zip(1..)
        .map(|(&(title, year), rank)| Film { rank, title, year })
        .collect()
}

fn film(title: &str) -> Film {
    films()
        .into_iter()
        .find(|film| film.title == title)
        .expect("film in fixture")
}

fn film_matches(query: &str, film: &Film, _index: usize) -> bool {
    format!("{}. {} {}", film.rank, film.title, film.year)
        .to_lowercase()
        .contains(&query.to_lowercase())
}

fn film_list() -> QueryListBuilder<Film> {
    QueryList::builder(films()).item_predicate(film_matches)
}

fn fruit_list() -> QueryListBuilder<String> {
    let fruits: Vec<String> = ["apple", "banana", "cherry"]
        .iter()
        .map(|fruit| fruit.to_string())
        .collect();
    QueryList::builder(fruits)
        .item_predicate(|query: &str, item: &String, _index: usize| item.contains(query))
}

fn press(code: KeyCode) -> KeyMsg {
    KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    }
}

/// Strips styling and trailing whitespace.
fn normalize(s: &str) -> String {
    lipgloss_extras::lipgloss::strip_ansi(s)
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

type Observed<T> = Arc<Mutex<Vec<ActiveItem<T>>>>;

fn observe<T: Item>() -> (Observed<T>, impl FnMut(&ActiveItem<T>) + Send + 'static) {
    let observed: Observed<T> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    (observed, move |item: &ActiveItem<T>| {
        sink.lock().unwrap().push(item.clone())
    })
}

fn active_changes<T: Clone>(events: &[QueryListEvent<T>]) -> Vec<ActiveItem<T>> {
    events
        .iter()
        .filter_map(|event| match event {
            QueryListEvent::ActiveItemChanged(item) => Some(item.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_fixture_has_four_films_from_1999() {
    let films = films();
    assert_eq!(films.len(), 100);
    assert_eq!(films.iter().filter(|film| film.year == 1999).count(), 4);
}

#[test]
fn test_initial_active_item_is_first_filtered_item() {
    let list = film_list().build();
    assert!(!list.is_controlled());
    assert_eq!(
        list.active_item(),
        &ActiveItem::Item(film("The Shawshank Redemption"))
    );

    let list = film_list().query("1999").build();
    assert_eq!(list.active_item(), &ActiveItem::Item(film("Fight Club")));
}

#[test]
fn test_initial_active_item_is_no_item_when_nothing_matches() {
    let list = film_list().query("no such film").build();
    assert!(list.filtered_items().is_empty());
    assert_eq!(list.active_item(), &ActiveItem::NoItem);
}

#[test]
fn test_initial_active_item_can_be_given() {
    let list = film_list().initial_active_item(film("Alien")).build();
    assert!(!list.is_controlled());
    assert_eq!(list.active_item(), &ActiveItem::Item(film("Alien")));
}

#[test]
fn test_initial_active_item_outside_filter_falls_back_to_first_row() {
    let list = film_list()
        .query("1999")
        .initial_active_item(film("Alien"))
        .build();
    assert_eq!(list.active_item(), &ActiveItem::Item(film("Fight Club")));
    assert_eq!(list.active_index(), Some(0));
}

#[test]
fn test_query_filters_and_resets_active_item() {
    let mut list = film_list().build();
    let events = list.set_query("1999");

    let titles: Vec<&str> = list.filtered_items().iter().map(|film| film.title).collect();
    assert_eq!(
        titles,
        vec!["Fight Club", "The Matrix", "The Green Mile", "American Beauty"]
    );
    assert_eq!(
        events,
        vec![
            QueryListEvent::ActiveItemChanged(ActiveItem::Item(film("Fight Club"))),
            QueryListEvent::QueryChanged("1999".to_string()),
        ]
    );
}

#[test]
fn test_unchanged_query_emits_nothing() {
    let mut list = film_list().query("1999").build();
    assert!(list.set_query("1999").is_empty());
}

#[test]
fn test_list_predicate_wins_over_item_predicate() {
    let item_calls = Arc::new(AtomicUsize::new(0));
    let list_calls = Arc::new(AtomicUsize::new(0));
    let item_counter = Arc::clone(&item_calls);
    let list_counter = Arc::clone(&list_calls);

    let mut list = QueryList::builder(films())
        .item_predicate(move |_query: &str, _film: &Film, _index: usize| {
            item_counter.fetch_add(1, Ordering::SeqCst);
            true
        })
        .item_list_predicate(move |_query: &str, films: &[Film]| {
            list_counter.fetch_add(1, Ordering::SeqCst);
            films.iter().rev().take(3).cloned().collect()
        })
        .build();
    assert_eq!(list.predicates().strategy(), FilterStrategy::WholeList);

    list.set_query("anything");
    let titles: Vec<&str> = list.filtered_items().iter().map(|film| film.title).collect();
    assert_eq!(
        titles,
        vec!["Monty Python and the Holy Grail", "3 Idiots", "Snatch"]
    );
    assert_eq!(item_calls.load(Ordering::SeqCst), 0);
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_filtering_is_memoized_on_its_inputs() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let predicate: ItemPredicate<Film> = Arc::new(move |query: &str, film: &Film, index: usize| {
        counter.fetch_add(1, Ordering::SeqCst);
        film_matches(query, film, index)
    });

    let mut list = QueryList::builder(films())
        .predicates(Predicates {
            item: Some(Arc::clone(&predicate)),
            list: None,
        })
        .build();
    assert_eq!(calls.load(Ordering::SeqCst), 100);

    // Same query, same allocation, same predicate.
    list.set_query("");
    let items = Arc::clone(list.shared_items());
    list.set_items(items);
    list.set_item_predicate(Some(Arc::clone(&predicate)));
    assert_eq!(calls.load(Ordering::SeqCst), 100);

    // A fresh allocation with equal contents still recomputes.
    list.set_items(films());
    assert_eq!(calls.load(Ordering::SeqCst), 200);

    list.set_query("1999");
    assert_eq!(calls.load(Ordering::SeqCst), 300);
}

#[test]
fn test_key_comparison_keeps_active_item_across_new_instances() {
    let mut list = film_list()
        .items_equal(ItemsEqual::by_key(|film: &Film| film.rank))
        .build();
    let renamed: Vec<Film> = films()
        .into_iter()
        .map(|film| Film {
            title: "Renamed",
            ..film
        })
        .collect();

    let events = list.set_items(renamed);
    assert!(events.is_empty());
    assert_eq!(
        list.active_item(),
        &ActiveItem::Item(film("The Shawshank Redemption"))
    );
}

#[test]
fn test_identity_comparison_replaces_stale_active_item() {
    let mut list = film_list().build();
    let renamed: Vec<Film> = films()
        .into_iter()
        .map(|film| Film {
            title: "Renamed",
            ..film
        })
        .collect();
    let first = renamed[0].clone();

    let events = list.set_items(renamed);
    assert_eq!(active_changes(&events), vec![ActiveItem::Item(first.clone())]);
    assert_eq!(list.active_item(), &ActiveItem::Item(first));
}

#[test]
fn test_active_item_moves_when_filtered_out() {
    let mut list = fruit_list()
        .options(QueryListOptions {
            reset_on_query: false,
            ..QueryListOptions::default()
        })
        .build();
    assert_eq!(list.active_item(), &ActiveItem::Item("apple".to_string()));

    let events = list.set_query("ban");
    assert_eq!(
        events,
        vec![
            QueryListEvent::ActiveItemChanged(ActiveItem::Item("banana".to_string())),
            QueryListEvent::QueryChanged("ban".to_string()),
        ]
    );
}

#[test]
fn test_active_item_kept_while_still_rendered() {
    let mut list = fruit_list()
        .options(QueryListOptions {
            reset_on_query: false,
            ..QueryListOptions::default()
        })
        .build();
    list.move_active_item(1);
    assert_eq!(list.active_item(), &ActiveItem::Item("banana".to_string()));

    let events = list.set_query("an");
    assert!(active_changes(&events).is_empty());
    assert_eq!(list.active_item(), &ActiveItem::Item("banana".to_string()));
}

#[test]
fn test_empty_result_notifies_no_item_once() {
    let (observed, on_change) = observe::<Film>();
    let mut list = film_list().on_active_item_change(on_change).build();

    let events = list.set_query("no such film");
    assert_eq!(active_changes(&events), vec![ActiveItem::NoItem]);
    assert_eq!(list.active_item(), &ActiveItem::NoItem);

    let events = list.set_query("still no such film");
    assert!(active_changes(&events).is_empty());
    assert_eq!(observed.lock().unwrap().as_slice(), &[ActiveItem::NoItem]);
}

#[test]
fn test_arrow_keys_clamp_to_ends() {
    let mut list = film_list().query("1999").build();

    list.handle_key_down(&press(KeyCode::Up));
    assert_eq!(list.active_item(), &ActiveItem::Item(film("Fight Club")));

    for _ in 0..6 {
        list.handle_key_down(&press(KeyCode::Down));
    }
    assert_eq!(
        list.active_item(),
        &ActiveItem::Item(film("American Beauty"))
    );
    assert_eq!(list.active_index(), Some(3));

    list.handle_key_down(&press(KeyCode::Up));
    assert_eq!(
        list.active_item(),
        &ActiveItem::Item(film("The Green Mile"))
    );
}

#[test]
fn test_arrow_keys_clamp_over_twenty_rows() {
    let mut list = QueryList::builder(films())
        .item_predicate(|_query: &str, _film: &Film, index: usize| index < 20)
        .build();
    assert_eq!(list.filtered_items().len(), 20);

    list.handle_key_down(&press(KeyCode::Up));
    assert_eq!(list.active_index(), Some(0));

    for _ in 0..25 {
        list.handle_key_down(&press(KeyCode::Down));
    }
    assert_eq!(list.active_index(), Some(19));
    assert_eq!(
        list.active_item(),
        &ActiveItem::Item(film("Star Wars: Episode IV - A New Hope"))
    );
}

#[test]
fn test_arrow_keys_on_empty_list_do_nothing() {
    let mut list = film_list().query("no such film").build();
    assert!(list.handle_key_down(&press(KeyCode::Down)).is_empty());
    assert_eq!(list.active_item(), &ActiveItem::NoItem);
}

#[test]
fn test_enter_selects_on_key_up_only() {
    let mut list = film_list().query("1999").build();

    assert!(list.handle_key_down(&press(KeyCode::Enter)).is_empty());

    let events = list.handle_key_up(&press(KeyCode::Enter));
    assert!(events.contains(&QueryListEvent::ItemSelected(film("Fight Club"))));
}

#[test]
fn test_item_renderer_called_once_per_filtered_item() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut list = film_list()
        .item_renderer(move |film: &Film, _props: &ItemRendererProps<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(film.title.to_string())
        })
        .options(QueryListOptions {
            no_results: Some("No results.".to_string()),
            ..QueryListOptions::default()
        })
        .build();

    list.set_query("1999");
    let view = list.view();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(
        view,
        "Fight Club\nThe Matrix\nThe Green Mile\nAmerican Beauty"
    );

    calls.store(0, Ordering::SeqCst);
    list.set_query("no such film");
    assert_eq!(list.view(), "No results.");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_initial_content_shown_for_empty_query() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let list = film_list()
        .item_renderer(move |film: &Film, _props: &ItemRendererProps<'_>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(film.title.to_string())
        })
        .options(QueryListOptions {
            initial_content: Some("Type to search.".to_string()),
            ..QueryListOptions::default()
        })
        .build();

    assert_eq!(list.view(), "Type to search.");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_reset_on_select_reports_selected_then_first_item() {
    let (observed, on_change) = observe::<Film>();
    let selected = Arc::new(Mutex::new(Vec::new()));
    let selected_sink = Arc::clone(&selected);

    let mut list = film_list()
        .options(QueryListOptions {
            reset_on_select: true,
            ..QueryListOptions::default()
        })
        .on_active_item_change(on_change)
        .on_item_select(move |film: &Film| selected_sink.lock().unwrap().push(film.clone()))
        .build();

    list.set_query("1999");
    observed.lock().unwrap().clear();

    list.handle_item_select(&film("The Matrix"));
    assert_eq!(
        observed.lock().unwrap().as_slice(),
        &[
            ActiveItem::Item(film("The Matrix")),
            ActiveItem::Item(film("The Shawshank Redemption")),
        ]
    );
    assert_eq!(selected.lock().unwrap().as_slice(), &[film("The Matrix")]);
    assert_eq!(list.query(), "");
    assert_eq!(list.filtered_items().len(), 100);
}

#[test]
fn test_reset_on_select_with_empty_query_moves_to_first_item() {
    let (observed, on_change) = observe::<Film>();
    let mut list = film_list()
        .options(QueryListOptions {
            reset_on_select: true,
            ..QueryListOptions::default()
        })
        .on_active_item_change(on_change)
        .build();

    let events = list.handle_item_select(&film("The Matrix"));
    assert_eq!(
        observed.lock().unwrap().as_slice(),
        &[
            ActiveItem::Item(film("The Matrix")),
            ActiveItem::Item(film("The Shawshank Redemption")),
        ]
    );
    assert_eq!(
        list.active_item(),
        &ActiveItem::Item(film("The Shawshank Redemption"))
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, QueryListEvent::QueryChanged(_))));
}

#[test]
fn test_disabled_items_cannot_be_selected() {
    let mut list = film_list()
        .item_disabled(ItemDisabled::by_key(|film: &Film| film.year < 1950))
        .build();

    let casablanca = film("Casablanca");
    assert!(list.item_modifiers(&casablanca, 32).disabled);
    assert!(list.handle_item_select(&casablanca).is_empty());
    assert_eq!(
        list.active_item(),
        &ActiveItem::Item(film("The Shawshank Redemption"))
    );

    let events = list.handle_item_select(&film("Alien"));
    assert!(events.contains(&QueryListEvent::ItemSelected(film("Alien"))));
}

#[test]
fn test_item_modifiers() {
    let list = film_list().query("1999").build();
    let fight_club = film("Fight Club");
    let alien = film("Alien");

    assert_eq!(
        list.item_modifiers(&fight_club, 0),
        ItemModifiers {
            active: true,
            disabled: false,
            matches_predicate: true,
        }
    );
    assert_eq!(list.item_modifiers(&alien, 0), ItemModifiers::default());
}

#[test]
fn test_controlled_list_only_requests_changes() {
    let (observed, on_change) = observe::<Film>();
    let godfather = film("The Godfather: Part II");
    let mut list = film_list()
        .active_item(ActiveItem::Item(godfather.clone()))
        .on_active_item_change(on_change)
        .build();
    assert!(list.is_controlled());
    assert_eq!(list.active_item(), &ActiveItem::Item(godfather.clone()));

    list.set_query("1999");
    assert_eq!(
        observed.lock().unwrap().as_slice(),
        &[ActiveItem::Item(film("Fight Club"))]
    );
    assert_eq!(list.active_item(), &ActiveItem::Item(godfather));

    list.set_active_item(ActiveItem::Item(film("Fight Club")))
        .unwrap();
    assert_eq!(list.active_item(), &ActiveItem::Item(film("Fight Club")));

    list.handle_key_down(&press(KeyCode::Down));
    assert_eq!(list.active_item(), &ActiveItem::Item(film("Fight Club")));
    assert_eq!(
        observed.lock().unwrap().last(),
        Some(&ActiveItem::Item(film("The Matrix")))
    );
}

#[test]
fn test_control_mode_cannot_change() {
    let mut uncontrolled = film_list().build();
    assert_eq!(
        uncontrolled.set_active_item(ActiveItem::NoItem),
        Err(Error::ControlModeChange { controlled: false })
    );

    let mut controlled = film_list().active_item(ActiveItem::NoItem).build();
    assert_eq!(
        controlled.set_active_item(ActiveItem::Unset),
        Err(Error::ControlModeChange { controlled: true })
    );
    assert!(controlled.set_active_item(ActiveItem::NoItem).is_ok());
}

#[test]
fn test_create_new_item_row() {
    let mut list = fruit_list()
        .create_new_item_from_query(|query: &str| query.to_string())
        .build();
    assert!(!list.is_create_item_rendered());

    list.set_query("kiwi");
    assert!(list.is_create_item_rendered());
    assert_eq!(list.create_new_item(), Some(&"kiwi".to_string()));
    assert_eq!(list.active_item(), &ActiveItem::CreateNewItem);

    let events = list.handle_key_up(&press(KeyCode::Enter));
    assert_eq!(events, vec![QueryListEvent::ItemSelected("kiwi".to_string())]);

    list.set_query("apple");
    assert!(!list.is_create_item_rendered());
    assert_eq!(list.active_item(), &ActiveItem::Item("apple".to_string()));
}

#[test]
fn test_create_new_item_row_first() {
    let mut list = fruit_list()
        .create_new_item_from_query(|query: &str| query.to_string())
        .item_renderer(DefaultItemRenderer::new())
        .options(QueryListOptions {
            create_new_item_position: CreateNewItemPosition::First,
            ..QueryListOptions::default()
        })
        .build();

    list.set_query("an");
    assert_eq!(list.active_item(), &ActiveItem::CreateNewItem);

    list.handle_key_down(&press(KeyCode::Down));
    assert_eq!(list.active_item(), &ActiveItem::Item("banana".to_string()));
    list.handle_key_down(&press(KeyCode::Down));
    assert_eq!(list.active_item(), &ActiveItem::Item("banana".to_string()));

    assert_eq!(normalize(&list.view()), "  + Create \"an\"\n> banana");
}

#[test]
fn test_default_item_renderer_marks_active_row() {
    let list = film_list()
        .query("1999")
        .item_renderer(DefaultItemRenderer::new())
        .build();

    assert_eq!(
        normalize(&list.view()),
        "> 10. Fight Club (1999)\n  18. The Matrix (1999)\n  36. The Green Mile (1999)\n  62. American Beauty (1999)"
    );
}

#[test]
fn test_fuzzy_list_predicate_ranks_matches() {
    let list = QueryList::builder(films())
        .predicates(Predicates {
            item: None,
            list: Some(fuzzy_list_predicate(|film: &Film| film.title.to_string())),
        })
        .query("matrix")
        .build();
    assert_eq!(list.filtered_items()[0].title, "The Matrix");
}

#[test]
fn test_options_from_json() {
    let options: QueryListOptions = serde_json::from_str(
        r#"{ "reset_on_select": true, "create_new_item_position": "first" }"#,
    )
    .unwrap();

    assert!(options.reset_on_select);
    assert!(options.reset_on_query);
    assert!(options.scroll_to_active_item);
    assert_eq!(
        options.create_new_item_position,
        CreateNewItemPosition::First
    );
}

fn scrolled_list() -> QueryList<Film> {
    let mut list = QueryList::builder(films().into_iter().take(10).collect::<Vec<_>>())
        .item_renderer(|film: &Film, _props: &ItemRendererProps<'_>| {
            Some(film.title.to_string())
        })
        .build();
    list.attach_items_parent(ItemsParent::new(3));
    list
}

#[tokio::test]
async fn test_scroll_check_runs_after_next_frame() {
    let mut list = scrolled_list();
    for _ in 0..5 {
        list.move_active_item(1);
    }
    assert!(list.needs_viewport_check());
    assert_eq!(list.items_parent().unwrap().scroll_top, 0);

    let msg = list.scroll_cmd().unwrap().await.unwrap();
    let scroll_msg = msg.downcast_ref::<ScrollIntoViewMsg>().unwrap();
    assert!(list.handle_scroll_msg(scroll_msg));

    assert!(!list.needs_viewport_check());
    assert_eq!(list.items_parent().unwrap().scroll_top, 3);
    assert_eq!(list.view(), "The Dark Knight\n12 Angry Men\nSchindler's List");

    // The check runs once per flag.
    assert!(!list.handle_scroll_msg(scroll_msg));
    assert!(list.scroll_cmd().is_none());
}

#[tokio::test]
async fn test_stale_scroll_checks_are_ignored() {
    let mut list = scrolled_list();
    list.move_active_item(1);

    let stale = list.scroll_cmd().unwrap();
    let fresh = list.scroll_cmd().unwrap();

    let msg = stale.await.unwrap();
    assert!(!list.handle_scroll_msg(msg.downcast_ref::<ScrollIntoViewMsg>().unwrap()));
    assert!(list.needs_viewport_check());

    let msg = fresh.await.unwrap();
    assert!(list.handle_scroll_msg(msg.downcast_ref::<ScrollIntoViewMsg>().unwrap()));
}

#[tokio::test]
async fn test_scroll_check_dropped_after_teardown() {
    let mut list = scrolled_list();
    let cmd = list.scroll_cmd().unwrap();
    drop(list);
    assert!(cmd.await.is_none());
}

#[test]
fn test_model_update_moves_and_schedules_scroll() {
    let mut list = film_list().build();
    let cmd = BubbleTeaModel::update(&mut list, Box::new(press(KeyCode::Down)) as Msg);

    assert!(cmd.is_some());
    assert_eq!(list.active_item(), &ActiveItem::Item(film("The Godfather")));
}

#[test]
fn test_model_ignores_foreign_scroll_messages() {
    let mut list = film_list().build();
    let foreign = ScrollIntoViewMsg {
        id: list.id() + 1,
        tag: 1,
    };
    assert!(BubbleTeaModel::update(&mut list, Box::new(foreign) as Msg).is_none());
    assert!(!list.handle_scroll_msg(&foreign));
}
