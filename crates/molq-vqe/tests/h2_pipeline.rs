//! End-to-end runs on H2/STO-3G at 0.735 Å.

use approx::assert_abs_diff_eq;
use molq_adapter_sim::{Estimator, StatevectorEstimator};
use molq_chem::{ChemError, JordanWignerMapper, MapperKind, ParityMapper, QubitMapper};
use molq_vqe::{
    ActiveSpaceConfig, AnsatzConfig, EstimatorConfig, ExactEigensolver, GroundStateEigensolver,
    InitialState, Lbfgs, OptimizerConfig, PipelineConfig, VqeError, run_pipeline,
};

const EXACT_TOTAL_ENERGY: f64 = -1.137306;
const HARTREE_FOCK_ENERGY: f64 = -1.116999;

#[test]
fn test_reference_run_reaches_ground_state() {
    let report = run_pipeline(&PipelineConfig::default()).unwrap();
    let energy = report.total_energy();
    assert!(
        (energy - (-1.1373)).abs() < 0.01,
        "estimated {} Hartree",
        energy
    );
    assert_eq!(report.num_parameters, 16);
    assert_eq!(report.ground_state.num_qubits, 4);
    assert_eq!(report.ground_state.num_pauli_terms, 15);
    assert_eq!(report.exact_energy, None);

    let vqe = report.ground_state.vqe.as_ref().unwrap();
    assert_eq!(vqe.optimizer, "cobyla");
    assert_eq!(vqe.energy_history.len(), vqe.circuit_evaluations);
    // stopped by its own criterion, inside the default budget of 500 per parameter
    assert!(vqe.converged);
    assert!(vqe.circuit_evaluations <= 500 * 16);
    assert!(
        (energy - EXACT_TOTAL_ENERGY).abs() < 1e-3,
        "estimated {} Hartree",
        energy
    );
    // VQE is variational
    assert!(energy >= EXACT_TOTAL_ENERGY - 1e-6);
}

#[test]
fn test_full_active_space_changes_nothing() {
    let reduced = run_pipeline(&PipelineConfig::default()).unwrap();
    let full = run_pipeline(&PipelineConfig {
        active_space: None,
        ..PipelineConfig::default()
    })
    .unwrap();
    assert_abs_diff_eq!(reduced.total_energy(), full.total_energy(), epsilon = 1e-9);
}

#[test]
fn test_runs_are_reproducible() {
    let a = run_pipeline(&PipelineConfig::default()).unwrap();
    let b = run_pipeline(&PipelineConfig::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_oversized_active_space_is_rejected() {
    let config = PipelineConfig {
        active_space: Some(ActiveSpaceConfig {
            num_electrons: 2,
            num_spatial_orbitals: 3,
            active_orbitals: None,
        }),
        ..PipelineConfig::default()
    };
    assert!(matches!(
        run_pipeline(&config),
        Err(VqeError::Chem(ChemError::TooManyActiveOrbitals {
            requested: 3,
            available: 2,
            ..
        }))
    ));
}

#[test]
fn test_exact_reference() {
    let report = run_pipeline(&PipelineConfig {
        exact_reference: true,
        optimizer: OptimizerConfig::Lbfgs(Lbfgs::default()),
        ..PipelineConfig::default()
    })
    .unwrap();
    let exact = report.exact_energy.unwrap();
    assert_abs_diff_eq!(exact, EXACT_TOTAL_ENERGY, epsilon = 1e-5);
    assert_abs_diff_eq!(report.total_energy(), exact, epsilon = 1e-4);
}

#[test]
fn test_parity_pipeline() {
    let report = run_pipeline(&PipelineConfig {
        mapper: MapperKind::Parity,
        optimizer: OptimizerConfig::Lbfgs(Lbfgs::default()),
        ..PipelineConfig::default()
    })
    .unwrap();
    assert_abs_diff_eq!(report.total_energy(), EXACT_TOTAL_ENERGY, epsilon = 1e-4);
}

#[test]
fn test_mappers_share_a_spectrum() {
    let problem = PipelineConfig::default().problem().unwrap();
    let jw = GroundStateEigensolver::new(JordanWignerMapper, ExactEigensolver::new());
    let parity = GroundStateEigensolver::new(ParityMapper, ExactEigensolver::new());
    let a = ExactEigensolver::new()
        .eigenvalues(&jw.qubit_operator(&problem).unwrap())
        .unwrap();
    let b = ExactEigensolver::new()
        .eigenvalues(&parity.qubit_operator(&problem).unwrap())
        .unwrap();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
    }
}

#[test]
fn test_hartree_fock_state_energy() {
    let problem = PipelineConfig::default().problem().unwrap();
    let ansatz_config = AnsatzConfig {
        initial_state: InitialState::HartreeFock,
        ..AnsatzConfig::default()
    };
    for kind in [MapperKind::JordanWigner, MapperKind::Parity] {
        let ansatz = ansatz_config.build(&problem, kind).unwrap();
        let operator = kind.mapper().map(&problem.second_q_op().unwrap()).unwrap();
        // all rotations at zero leave the determinant alone
        let circuit = ansatz.bind(&vec![0.0; ansatz.num_parameters()]).unwrap();
        let eigenvalue = StatevectorEstimator::new().estimate(&circuit, &operator).unwrap();
        let total = problem.interpret(&[eigenvalue]).total_energies()[0];
        assert_abs_diff_eq!(total, HARTREE_FOCK_ENERGY, epsilon = 1e-5);
    }
}

#[test]
fn test_shot_estimator_is_seeded() {
    let config = PipelineConfig {
        estimator: EstimatorConfig { shots: Some(2000) },
        optimizer: OptimizerConfig::default().with_maxiter(50),
        ..PipelineConfig::default()
    };
    let a = run_pipeline(&config).unwrap();
    let b = run_pipeline(&config).unwrap();
    assert_eq!(a, b);
    let vqe = a.ground_state.vqe.unwrap();
    assert!(vqe.circuit_evaluations <= 50);
    assert!(!vqe.converged);
}
