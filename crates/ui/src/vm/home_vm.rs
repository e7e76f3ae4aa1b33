use services::{ChapterOverview, QuizStats};

/// Stat tiles at the top of the home screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeStatsVm {
    pub completed_label: String,
    pub total_label: String,
    pub wrong_label: String,
}

#[must_use]
pub fn map_home_stats(stats: QuizStats) -> HomeStatsVm {
    HomeStatsVm {
        completed_label: stats.completed.to_string(),
        total_label: format!("/ {}", stats.total_questions),
        wrong_label: stats.wrong.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChapterCardVm {
    pub chapter_id: String,
    pub title: String,
    pub count_label: String,
    /// `None` hides the review button.
    pub review_label: Option<String>,
}

#[must_use]
pub fn map_chapter_cards(overviews: &[ChapterOverview]) -> Vec<ChapterCardVm> {
    overviews
        .iter()
        .map(|overview| ChapterCardVm {
            chapter_id: overview.chapter_id.to_string(),
            title: overview.title.clone(),
            count_label: match overview.question_count {
                1 => "1 question".to_string(),
                n => format!("{n} questions"),
            },
            review_label: overview
                .has_mistakes()
                .then(|| format!("Review mistakes ({})", overview.wrong_count)),
        })
        .collect()
}
