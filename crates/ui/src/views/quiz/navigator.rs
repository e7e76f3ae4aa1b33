use dioxus::prelude::*;
use services::GridCell;

use crate::vm::grid_cell_class;

/// Answer sheet: one numbered cell per active question.
#[component]
pub fn NavigatorGrid(cells: Vec<GridCell>, on_jump: EventHandler<usize>) -> Element {
    rsx! {
        div { class: "quiz-grid",
            div { class: "quiz-grid__header",
                h3 { "Answer sheet" }
                div { class: "quiz-grid__legend",
                    span { class: "legend legend--correct", "Mastered" }
                    span { class: "legend legend--wrong", "Mistake" }
                    span { class: "legend", "Unanswered" }
                }
            }
            div { class: "quiz-grid__cells",
                for cell in cells {
                    button {
                        key: "{cell.question_id}",
                        class: grid_cell_class(&cell),
                        r#type: "button",
                        onclick: move |_| on_jump.call(cell.position),
                        "{cell.position + 1}"
                    }
                }
            }
        }
    }
}
