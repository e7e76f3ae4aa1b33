mod home_vm;
mod markdown_vm;
mod quiz_vm;

pub use home_vm::{ChapterCardVm, HomeStatsVm, map_chapter_cards, map_home_stats};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use quiz_vm::{
    OptionMark, answer_label, counter_label, footer_hint, grid_cell_class, kind_badge,
    next_label, option_mark, progress_percent, verdict_banner,
};
