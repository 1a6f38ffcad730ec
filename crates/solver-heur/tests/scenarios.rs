use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sched_core::scoring::coverage;
use sched_core::{
    check_hard, AnnealParams, Evaluator, Objective, SchedError, SolveEnvelope, SolveParams,
    Solver, StartKind, TimetableData, TimetableInstance,
};
use solver_heur::{greedy, Annealer, HeurSolver};

const EPS: f64 = 1e-9;

fn open(slots: usize, days: usize, students: usize, assistants: usize) -> TimetableInstance {
    TimetableInstance {
        students: vec![vec![vec![0; students]; days]; slots],
        assistants: vec![vec![vec![0; assistants]; days]; slots],
        forbidden: vec![vec![0; days]; slots],
        baseline: None,
    }
}

fn quick(seed: u64) -> SolveParams {
    SolveParams {
        runs: vec![
            AnnealParams {
                initial_temperature: 10.0,
                final_temperature: 1.0,
                alpha: 0.9,
                max_iterations: 300,
            },
            AnnealParams {
                initial_temperature: 5.0,
                final_temperature: 1.0,
                alpha: 0.8,
                max_iterations: 300,
            },
        ],
        seed,
        ..SolveParams::default()
    }
}

/// Ten slots over five days; two students with morning lectures, one
/// assistant busy on day 0.
fn week() -> TimetableInstance {
    let mut inst = open(10, 5, 2, 2);
    for day in 0..5 {
        inst.students[1][day][0] = 1;
        inst.students[2][day][1] = 1;
        inst.students[3][day][1] = 2;
    }
    for slot in 0..10 {
        inst.assistants[slot][0][1] = 1;
    }
    inst.forbidden[5][2] = 1;
    inst
}

#[test]
fn toy_greedy_start_scores_092() {
    let d = TimetableData::from_instance(&open(2, 2, 1, 1)).expect("valid instance");
    let start = greedy(&d).expect("feasible");
    assert!(start.get(0, 0, 0));
    assert_eq!(start.assignment_count(), 1);
    assert!((Evaluator::default().score(&start, &d) - 0.92).abs() < EPS);
    assert_eq!(coverage(&start, &d), 1);
}

#[test]
fn toy_solve_never_ends_below_start() {
    let res = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: open(2, 2, 1, 1),
            params: quick(3),
        })
        .expect("solved");
    assert_eq!(res.status, "solved");
    assert!(res.fitness >= 0.92 - EPS);
    assert_eq!(res.covered_students, 1);
    assert_eq!(res.total_students, 1);
    assert_eq!(res.attendance_pct, 100.0);
    assert_eq!(res.assignments.len(), 1);
    assert_eq!(res.stats["method"], "sa");
    assert_eq!(res.stats["runs"].as_array().map(Vec::len), Some(2));
}

#[test]
fn forbidden_first_cell_moves_greedy_on() {
    let mut inst = open(2, 2, 1, 1);
    inst.forbidden[0][0] = 1;
    let d = TimetableData::from_instance(&inst).expect("valid instance");
    let start = greedy(&d).expect("feasible");
    assert!(start.get(1, 0, 0));
    assert!(!start.is_assigned(0, 0));
}

#[test]
fn no_assistants_gives_empty_schedule() {
    let res = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: open(3, 2, 4, 0),
            params: quick(1),
        })
        .expect("solved");
    assert!(res.assignments.is_empty());
    assert_eq!(res.fitness, 0.0);
    assert_eq!(res.covered_students, 0);
    assert_eq!(res.attendance_pct, 0.0);
}

#[test]
fn same_seed_same_result() {
    let a = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: week(),
            params: quick(17),
        })
        .expect("solved");
    let b = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: week(),
            params: quick(17),
        })
        .expect("solved");
    assert_eq!(a.assignments, b.assignments);
    assert_eq!(a.fitness, b.fitness);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn solved_schedule_is_feasible() {
    let inst = week();
    let d = TimetableData::from_instance(&inst).expect("valid instance");
    let res = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: inst,
            params: quick(5),
        })
        .expect("solved");
    let sol = sched_core::Solution::from_assignments(&d, &res.assignments).expect("in range");
    assert_eq!(check_hard(&sol, &d), Ok(()));
    assert_eq!(res.assignments.len(), 2);
    assert_eq!(res.grid.len(), 10);
    assert_eq!(res.grid[0].len(), 5);
}

#[test]
fn baseline_start_is_used() {
    let mut inst = open(2, 2, 1, 1);
    let mut base = vec![vec![vec![0u8; 1]; 2]; 2];
    base[1][1][0] = 1;
    inst.baseline = Some(base);
    let params = SolveParams {
        start: StartKind::Baseline,
        ..quick(9)
    };
    let res = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: inst,
            params,
        })
        .expect("solved");
    assert_eq!(res.stats["start"], "baseline");
    // (1,1) already scores 0.95, the best reachable single cell
    assert!((res.fitness - 0.95).abs() < EPS);
    for run in res.stats["runs"].as_array().expect("runs") {
        assert!((run["startFitness"].as_f64().expect("number") - 0.95).abs() < EPS);
    }
}

#[test]
fn missing_baseline_is_an_error() {
    let params = SolveParams {
        start: StartKind::Baseline,
        ..quick(1)
    };
    let err = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: open(2, 2, 1, 1),
            params,
        })
        .expect_err("no baseline");
    assert!(matches!(err, SchedError::MissingBaseline));
}

#[test]
fn infeasible_baseline_is_an_error() {
    let mut inst = open(2, 2, 1, 2);
    let mut base = vec![vec![vec![0u8; 2]; 2]; 2];
    base[0][0] = vec![1, 1];
    inst.baseline = Some(base);
    let params = SolveParams {
        start: StartKind::Baseline,
        ..quick(1)
    };
    let err = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: inst,
            params,
        })
        .expect_err("double booked");
    assert!(matches!(err, SchedError::InfeasibleStart(_)));
    assert!(err.is_infeasible());
}

#[test]
fn greedy_failure_surfaces() {
    let err = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: open(1, 1, 1, 2),
            params: quick(1),
        })
        .expect_err("two assistants, one cell");
    assert!(matches!(err, SchedError::InfeasibleAssignment { assistant: 1 }));
}

#[test]
fn empty_portfolio_is_rejected() {
    let params = SolveParams {
        runs: Vec::new(),
        ..SolveParams::default()
    };
    let err = HeurSolver::new()
        .solve(SolveEnvelope {
            instance: open(2, 2, 1, 1),
            params,
        })
        .expect_err("no runs");
    assert!(matches!(err, SchedError::InvalidParams(_)));
}

#[test]
fn annealing_improves_a_poor_start() {
    let d = TimetableData::from_instance(&week()).expect("valid instance");
    let start = greedy(&d).expect("feasible");
    let eval = Evaluator::default();
    let params = AnnealParams {
        initial_temperature: 2.0,
        final_temperature: 0.01,
        alpha: 0.95,
        max_iterations: 2000,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let out = Annealer::new(&d, &eval, params)
        .expect("valid params")
        .run(start.clone(), &mut rng, &mut ())
        .expect("feasible start");
    assert!(out.best_fitness >= eval.score(&start, &d));
    assert_eq!(check_hard(&out.best, &d), Ok(()));
}
