use sat_planner::planning::config::{SatConfig, SearchConfig};
use sat_planner::planning::heuristic::HeuristicType;
use sat_planner::planning::parser::parse_problem;
use sat_planner::planning::plan::{NoPlanReason, Plan, PlanOutcome};
use sat_planner::planning::problem::Problem;
use sat_planner::planning::sat_plan::solve_plan_via_sat;
use sat_planner::planning::search::search_plan_with;
use sat_planner::planning::state::State;
use std::collections::{HashSet, VecDeque};
use std::io::Cursor;
use std::time::Duration;

const LIGHT: &str = "\
c the smallest interesting problem
fluent on
goal on
action turn-on
pre -on
eff on
end
";

const LIGHT_ON: &str = "\
fluent on
init on
goal on
action turn-on
pre -on
eff on
end
";

/// A robot carries two balls from room a to room b, one at a time.
const BALLS: &str = "\
fluent at-a at-b b1-a b1-b b1-held b2-a b2-b b2-held free
init at-a b1-a b2-a free
goal b1-b b2-b

action move-ab
pre at-a
eff at-b -at-a
end

action move-ba
pre at-b
eff at-a -at-b
end

action pick-b1-a
pre at-a b1-a free
eff b1-held -b1-a -free
end

action pick-b2-a
pre at-a b2-a free
eff b2-held -b2-a -free
end

action drop-b1-b
pre at-b b1-held
eff b1-b free -b1-held
end

action drop-b2-b
pre at-b b2-held
eff b2-b free -b2-held
end
";

/// One press lights the lamp only if the power is on; the switch is a toggle.
const CONDITIONAL: &str = "\
fluent power lamp
goal lamp -power

action toggle
when power => -power
when -power => power
end

action press
when power => lamp
end
";

const UNSOLVABLE: &str = "\
fluent a b
goal b
action make-a
eff a
end
";

fn parse(input: &str) -> Problem {
    parse_problem(Cursor::new(input)).unwrap()
}

fn search(problem: &Problem, heuristic: HeuristicType, weight: f64) -> PlanOutcome {
    let config = SearchConfig::new(weight, Duration::from_secs(30)).unwrap();
    search_plan_with(problem, heuristic, &config).unwrap().outcome
}

fn sat(problem: &Problem, max_horizon: usize) -> PlanOutcome {
    let config = SatConfig::new(max_horizon, Duration::from_secs(30)).unwrap();
    solve_plan_via_sat(problem, &config).unwrap().outcome
}

/// Length of a shortest plan by breadth-first search.
fn shortest_plan_length(problem: &Problem) -> Option<usize> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(problem.initial_state().clone());
    queue.push_back((problem.initial_state().clone(), 0));

    while let Some((state, depth)) = queue.pop_front() {
        if state.satisfies(problem.goal()) {
            return Some(depth);
        }
        for action in problem.actions() {
            if action.is_applicable(&state) {
                let next: State = action.successor(&state);
                if seen.insert(next.clone()) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
    }
    None
}

#[test]
fn test_turn_on_scenario() {
    let problem = parse(LIGHT);
    for weight in [0.5, 1.0, 4.0] {
        assert_eq!(
            search(&problem, HeuristicType::FastForward, weight),
            PlanOutcome::Found(Plan::new(vec![0]))
        );
    }
    assert_eq!(sat(&problem, 0), PlanOutcome::NoPlan(NoPlanReason::HorizonExhausted { max_horizon: 0 }));
    assert_eq!(sat(&problem, 1), PlanOutcome::Found(Plan::new(vec![0])));
}

#[test]
fn test_goal_already_true() {
    let problem = parse(LIGHT_ON);
    assert_eq!(search(&problem, HeuristicType::Blind, 1.0), PlanOutcome::Found(Plan::default()));
    assert_eq!(sat(&problem, 5), PlanOutcome::Found(Plan::default()));
}

#[test]
fn test_conditional_effects() {
    let problem = parse(CONDITIONAL);
    let expected = shortest_plan_length(&problem);
    assert_eq!(expected, Some(3));

    let found = sat(&problem, 10).into_plan().unwrap();
    assert_eq!(found.len(), 3);
    let names: Vec<&str> = found
        .iter()
        .map(|i| problem.actions()[i].name())
        .collect();
    assert_eq!(names, ["toggle", "press", "toggle"]);

    let searched = search(&problem, HeuristicType::Max, 1.0).into_plan().unwrap();
    assert!(searched.validate(&problem).is_ok());
    assert_eq!(searched.len(), 3);
}

#[test]
fn test_every_heuristic_yields_a_valid_plan() {
    let problem = parse(BALLS);
    for heuristic in [
        HeuristicType::Blind,
        HeuristicType::GoalCount,
        HeuristicType::Max,
        HeuristicType::Sum,
        HeuristicType::FastForward,
    ] {
        for weight in [1.0, 2.0, 5.0] {
            let plan = search(&problem, heuristic, weight).into_plan().unwrap();
            let last = plan.validate(&problem).unwrap();
            assert!(last.satisfies(problem.goal()), "{heuristic} with weight {weight}");
        }
    }
}

#[test]
fn test_weight_one_admissible_is_optimal() {
    let problem = parse(BALLS);
    let optimal = search(&problem, HeuristicType::Max, 1.0).into_plan().unwrap();
    assert_eq!(Some(optimal.len()), shortest_plan_length(&problem));

    for weight in [1.5, 3.0, 10.0] {
        let plan = search(&problem, HeuristicType::FastForward, weight)
            .into_plan()
            .unwrap();
        assert!(plan.len() >= optimal.len());
    }
}

#[test]
fn test_sat_and_search_agree_on_length() {
    let problem = parse(BALLS);
    let shortest = shortest_plan_length(&problem).unwrap();

    let by_sat = sat(&problem, 20).into_plan().unwrap();
    assert!(by_sat.validate(&problem).is_ok());
    assert_eq!(by_sat.len(), shortest);

    let by_blind = search(&problem, HeuristicType::Blind, 1.0).into_plan().unwrap();
    assert_eq!(by_blind.len(), shortest);
}

#[test]
fn test_unsolvable() {
    let problem = parse(UNSOLVABLE);
    assert_eq!(
        search(&problem, HeuristicType::FastForward, 1.0),
        PlanOutcome::NoPlan(NoPlanReason::Exhausted)
    );
    assert_eq!(
        sat(&problem, 4),
        PlanOutcome::NoPlan(NoPlanReason::HorizonExhausted { max_horizon: 4 })
    );
}
