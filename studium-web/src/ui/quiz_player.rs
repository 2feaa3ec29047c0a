use studium_client::{api::QuizSet, QuizAttempt, Score};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct QuizPlayerProps {
    pub quiz: QuizSet,
}

pub enum QuizMsg {
    Select(usize, usize),
    Submit,
    Restart,
}

pub struct QuizPlayer {
    attempt: QuizAttempt,
    score: Option<Score>,
}

impl Component for QuizPlayer {
    type Message = QuizMsg;
    type Properties = QuizPlayerProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            attempt: QuizAttempt::new(&ctx.props().quiz, &mut rand::thread_rng()),
            score: None,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.attempt = QuizAttempt::new(&ctx.props().quiz, &mut rand::thread_rng());
        self.score = None;
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            QuizMsg::Select(q, a) => self.attempt.select(q, a),
            QuizMsg::Submit => {
                let score = self.attempt.submit();
                tracing::debug!(?score, "quiz submitted");
                self.score = Some(score);
            }
            QuizMsg::Restart => {
                self.attempt = QuizAttempt::new(&ctx.props().quiz, &mut rand::thread_rng());
                self.score = None;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let submitted = self.attempt.is_submitted();
        let questions = self.attempt.questions().iter().enumerate().map(|(qi, q)| {
            let answers = q.answers.iter().enumerate().map(|(ai, a)| {
                let picked = self.attempt.selected(qi) == Some(ai);
                let verdict = match (submitted, a.correct, picked) {
                    (true, true, _) => Some("list-group-item-success"),
                    (true, false, true) => Some("list-group-item-danger"),
                    _ => None,
                };
                html! {
                    <button
                        type="button"
                        class={ classes!(
                            "list-group-item", "list-group-item-action",
                            picked.then(|| "active"), verdict,
                        ) }
                        disabled={ submitted }
                        onclick={ ctx.link().callback(move |_| QuizMsg::Select(qi, ai)) }
                    >
                        { &a.text }
                    </button>
                }
            });
            html! {
                <div class="card mb-3">
                    <div class="card-body">
                        <h5 class="card-title">{ format!("{}. {}", qi + 1, q.text) }</h5>
                        <div class="list-group">{ for answers }</div>
                    </div>
                </div>
            }
        });
        html! {
            <div class="quiz-player my-3">
                { for questions }
                { match self.score {
                    None => html! {
                        <button
                            class="btn btn-primary"
                            disabled={ self.attempt.answered() == 0 }
                            onclick={ ctx.link().callback(|_| QuizMsg::Submit) }
                        >
                            { format!("Nộp bài ({}/{})", self.attempt.answered(), self.attempt.questions().len()) }
                        </button>
                    },
                    Some(s) => html! {
                        <div class="d-flex align-items-center">
                            <span class="fs-5 me-3">{ format!("Kết quả: {}/{}", s.correct, s.total) }</span>
                            <button class="btn btn-outline-primary" onclick={ ctx.link().callback(|_| QuizMsg::Restart) }>
                                { "Làm lại" }
                            </button>
                        </div>
                    },
                } }
            </div>
        }
    }
}
