use async_trait::async_trait;
use jerry_games::{
    ActionId, Choice, GameAction, GameError, GameId, GameKind, GameRegistry, GameView,
    Participant, RenderError, Renderer, RpsGame, TicTacToeGame, Transition,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

/// Keeps every view it was asked to show
#[derive(Default)]
struct RecordingRenderer {
    views: Mutex<Vec<GameView>>,
}

impl RecordingRenderer {
    fn count(&self) -> usize {
        self.views.lock().len()
    }

    fn last_texts(&self) -> Vec<String> {
        self.views
            .lock()
            .last()
            .map(|view| view.texts().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn render(&self, view: GameView) -> Result<(), RenderError> {
        self.views.lock().push(view);
        Ok(())
    }
}

fn player(id: u64) -> Participant {
    Participant::new(id, format!("player{id}"))
}

fn vote(game: GameId, choice: Choice) -> ActionId {
    ActionId::new(GameKind::Rps, game, GameAction::Vote(choice))
}

fn cell(game: GameId, index: usize) -> ActionId {
    ActionId::new(GameKind::TicTacToe, game, GameAction::Move(index))
}

#[tokio::test]
async fn rps_round_renders_each_vote_and_the_result() {
    let registry = GameRegistry::default();
    let renderer = Arc::new(RecordingRenderer::default());
    let game_id = registry.start(
        RpsGame::new(3, registry.timeout()).unwrap(),
        renderer.clone(),
    );

    for (id, choice) in [(1, Choice::Rock), (2, Choice::Rock), (3, Choice::Scissors)] {
        let transition = registry
            .dispatch(&vote(game_id, choice), &player(id))
            .await
            .unwrap();
        assert_eq!(transition, Transition::Applied);
    }

    assert_eq!(renderer.count(), 3);
    assert_eq!(
        renderer.last_texts(),
        vec!["🏆 **player1** - 🪨\n🏆 **player2** - 🪨\n❌ player3 - ✂️\n".to_string()]
    );
    assert!(!registry.contains(game_id));
    assert!(matches!(
        registry
            .dispatch(&vote(game_id, Choice::Paper), &player(4))
            .await,
        Err(GameError::UnknownGame { .. })
    ));
}

#[tokio::test]
async fn duplicate_vote_is_acknowledged_without_render() {
    let registry = GameRegistry::default();
    let renderer = Arc::new(RecordingRenderer::default());
    let game_id = registry.start(
        RpsGame::new(2, registry.timeout()).unwrap(),
        renderer.clone(),
    );

    registry
        .dispatch(&vote(game_id, Choice::Rock), &player(1))
        .await
        .unwrap();
    let again = registry
        .dispatch(&vote(game_id, Choice::Paper), &player(1))
        .await
        .unwrap();

    assert!(!again.is_applied());
    assert_eq!(renderer.count(), 1);
    assert_eq!(renderer.last_texts()[1], "(1/2) player1");
}

#[tokio::test]
async fn tictactoe_match_through_registry() {
    let registry = GameRegistry::default();
    let renderer = Arc::new(RecordingRenderer::default());
    let game_id = registry.start(TicTacToeGame::new(player(1)), renderer.clone());

    let join = ActionId::new(GameKind::TicTacToe, game_id, GameAction::Join);
    assert!(!registry.dispatch(&join, &player(1)).await.unwrap().is_applied());
    assert!(registry.dispatch(&join, &player(2)).await.unwrap().is_applied());
    assert!(!registry.dispatch(&join, &player(3)).await.unwrap().is_applied());

    // Out of turn
    assert!(!registry.dispatch(&cell(game_id, 0), &player(2)).await.unwrap().is_applied());

    for (who, index) in [(1, 0), (2, 4), (1, 1), (2, 8), (1, 2)] {
        let transition = registry
            .dispatch(&cell(game_id, index), &player(who))
            .await
            .unwrap();
        assert_eq!(transition, Transition::Applied, "move {index}");
    }

    assert_eq!(renderer.count(), 6);
    assert_eq!(
        renderer.last_texts(),
        vec![
            "**Winner:** <@1> (❌)".to_string(),
            "❌ player1, ⭕ player2".to_string()
        ]
    );
    assert!(registry.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_votes_never_exceed_player_count() {
    let registry = GameRegistry::default();
    let renderer = Arc::new(RecordingRenderer::default());
    let game_id = registry.start(
        RpsGame::new(3, registry.timeout()).unwrap(),
        renderer.clone(),
    );

    let handles: Vec<_> = (1..=12)
        .map(|id| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .dispatch(&vote(game_id, Choice::Paper), &player(id))
                    .await
            })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        if let Ok(Transition::Applied) = handle.await.unwrap() {
            applied += 1;
        }
    }

    assert_eq!(applied, 3);
    assert_eq!(renderer.count(), 3);
    assert_eq!(renderer.last_texts()[0].lines().next(), Some("**🤝 It's a tie!**"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_moves_fill_exactly_one_cell_per_turn() {
    for _ in 0..20 {
        let registry = GameRegistry::default();
        let renderer = Arc::new(RecordingRenderer::default());
        let game_id = registry.start(TicTacToeGame::new(player(1)), renderer.clone());

        let join = ActionId::new(GameKind::TicTacToe, game_id, GameAction::Join);
        assert!(registry.dispatch(&join, &player(2)).await.unwrap().is_applied());

        let handles: Vec<_> = (0..9)
            .map(|index| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.dispatch(&cell(game_id, index), &player(1)).await
                })
            })
            .collect();

        let mut applied = 0;
        for handle in handles {
            if let Ok(Transition::Applied) = handle.await.unwrap() {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        assert_eq!(renderer.count(), 2);
        assert!(
            renderer.last_texts()[0].starts_with("**Turn:** <@2>"),
            "{:?}",
            renderer.last_texts()
        );
    }
}

#[tokio::test(start_paused = true)]
async fn inactivity_cancels_open_games() {
    let registry = GameRegistry::new(Duration::from_secs(120));
    let rps_renderer = Arc::new(RecordingRenderer::default());
    let ttt_renderer = Arc::new(RecordingRenderer::default());

    let rps = RpsGame::new(2, registry.timeout()).unwrap();
    let rps_id = rps.id();
    registry.start(rps, rps_renderer.clone());
    let ttt_id = registry.start(TicTacToeGame::new(player(1)), ttt_renderer.clone());

    tokio::time::sleep(Duration::from_secs(119)).await;
    assert_eq!(registry.len(), 2);
    assert_eq!(rps_renderer.count(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;

    assert!(!registry.contains(rps_id));
    assert!(!registry.contains(ttt_id));
    assert_eq!(rps_renderer.last_texts(), vec!["Game cancelled.".to_string()]);
    assert_eq!(
        ttt_renderer.last_texts(),
        vec!["Game cancelled.".to_string(), "❌ player1".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn activity_pushes_the_deadline_back() {
    let registry = GameRegistry::new(Duration::from_secs(120));
    let renderer = Arc::new(RecordingRenderer::default());
    let game_id = registry.start(TicTacToeGame::new(player(1)), renderer.clone());

    tokio::time::sleep(Duration::from_secs(100)).await;
    let join = ActionId::new(GameKind::TicTacToe, game_id, GameAction::Join);
    assert!(registry.dispatch(&join, &player(2)).await.unwrap().is_applied());

    // 150s since start, 50s since the join
    tokio::time::sleep(Duration::from_secs(50)).await;
    tokio::task::yield_now().await;
    assert!(registry.contains(game_id));
    assert_eq!(renderer.count(), 1);

    // 230s since start, 130s since the join
    tokio::time::sleep(Duration::from_secs(80)).await;
    tokio::task::yield_now().await;
    assert!(!registry.contains(game_id));
    assert_eq!(renderer.count(), 2);
    assert_eq!(renderer.last_texts()[0], "Game cancelled.");
}

#[tokio::test(start_paused = true)]
async fn timeout_after_finish_is_a_no_op() {
    let registry = GameRegistry::new(Duration::from_secs(120));
    let renderer = Arc::new(RecordingRenderer::default());
    let game_id = registry.start(
        RpsGame::new(2, registry.timeout()).unwrap(),
        renderer.clone(),
    );

    registry
        .dispatch(&vote(game_id, Choice::Rock), &player(1))
        .await
        .unwrap();
    registry
        .dispatch(&vote(game_id, Choice::Paper), &player(2))
        .await
        .unwrap();
    assert_eq!(renderer.count(), 2);

    tokio::time::sleep(Duration::from_secs(600)).await;
    tokio::task::yield_now().await;

    assert_eq!(renderer.count(), 2);
    assert_eq!(
        renderer.last_texts(),
        vec!["🏆 **player2** - 📄\n❌ player1 - 🪨\n".to_string()]
    );
}

#[tokio::test]
async fn finished_game_state_survives_late_clicks() {
    let registry = GameRegistry::default();
    let renderer = Arc::new(RecordingRenderer::default());
    let game = TicTacToeGame::new(player(1));
    let game_id = registry.start(game, renderer.clone());

    let join = ActionId::new(GameKind::TicTacToe, game_id, GameAction::Join);
    registry.dispatch(&join, &player(2)).await.unwrap();
    registry.expire(game_id).await.unwrap();

    assert!(matches!(
        registry.dispatch(&cell(game_id, 4), &player(1)).await,
        Err(GameError::UnknownGame { .. })
    ));
    assert_eq!(renderer.count(), 2);
    assert_eq!(renderer.last_texts()[0], "Game cancelled.");
}
