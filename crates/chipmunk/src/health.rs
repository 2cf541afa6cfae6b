//! Startup self-test (`# 6`): "given a HOTSParams and a sample seed, produce
//! a self-test vector (keygen → sign → verify → tree build → aggregate →
//! aggregate-verify), which callers can invoke at startup."
//!
//! Each stage is its own `tracing::instrument`-annotated function so a
//! caller's subscriber gets structured spans for free (`SPEC_FULL.md`'s
//! logging section), and [`HealthReport`] records per-stage pass/fail and
//! timing rather than collapsing the whole run into one boolean — a caller
//! doing a startup probe wants to know *which* stage regressed.

use std::time::{Duration, Instant};

use chipmunk_core::{DomainParams, Seed, Validity};
use chipmunk_hots::{HotsParams, HotsPublicKey, HotsSecretKey, HotsSignature};
use chipmunk_hvc::{HvcHasher, HvcTree, MembershipPath};
use chipmunk_sampler::Xof;
use thiserror::Error;

/// Number of synthetic participants the self-test signs and aggregates.
/// Small enough to run cheaply on every startup; large enough to exercise
/// the tree's branching (`# 2`'s step 3-5 data flow) rather than degenerate
/// to the `n = 1` case.
const PARTICIPANT_COUNT: usize = 3;

const HEALTH_CHECK_MESSAGE: &[u8] = b"chipmunk health check";
const PARTICIPANT_SEED_DOMAIN_SEPARATOR: &[u8] = b"chipmunk-health-check-participant";

/// Everything that can stop the self-test from *running* at all — a
/// construction-level error from a stage's underlying operation, not that
/// stage's own check failing (that's recorded as `passed: false` in the
/// corresponding [`StageResult`] instead, per `# 7`'s "verification failure
/// is not an error" policy).
#[derive(Debug, Error)]
pub enum HealthCheckError {
    /// A HOTS keygen/sign/verify call returned an error.
    #[error(transparent)]
    Hots(#[from] chipmunk_hots::HotsError),
    /// An HVC hash/tree call returned an error.
    #[error(transparent)]
    Hvc(#[from] chipmunk_hvc::HvcError),
    /// An aggregation call returned an error.
    #[error(transparent)]
    Aggregate(#[from] chipmunk_aggregate::AggregateError),
}

/// The outcome of one self-test stage.
#[derive(Debug, Clone, Copy)]
pub struct StageResult {
    /// The stage's name, for logging and display.
    pub name: &'static str,
    /// Whether this stage's own check (if it has one) passed.
    pub passed: bool,
    /// Wall-clock time this stage took.
    pub duration: Duration,
}

/// The full self-test outcome: one [`StageResult`] per stage of the causal
/// chain, plus total wall-clock time.
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Per-stage results, in execution order.
    pub stages: Vec<StageResult>,
    /// Total wall-clock time across every stage.
    pub total: Duration,
}

impl HealthReport {
    /// `true` iff every stage passed its own check.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.stages.iter().all(|stage| stage.passed)
    }
}

fn derive_participant_seed(base: &[u8; 32], index: usize) -> Seed {
    let mut separator = PARTICIPANT_SEED_DOMAIN_SEPARATOR.to_vec();
    separator.extend_from_slice(index.to_be_bytes().as_slice());
    let mut xof = Xof::new(base, &separator);
    let mut bytes = [0u8; 32];
    xof.fill(&mut bytes);
    Seed::new(bytes)
}

fn timed<T>(name: &'static str, stages: &mut Vec<StageResult>, passed: bool, f: impl FnOnce() -> T) -> T
where
    T: Sized,
{
    let start = Instant::now();
    let result = f();
    stages.push(StageResult { name, passed, duration: start.elapsed() });
    result
}

#[tracing::instrument(skip_all)]
fn keygen_stage(hots_params: &HotsParams, seed: [u8; 32]) -> Result<Vec<(HotsPublicKey, HotsSecretKey)>, HealthCheckError> {
    (0..PARTICIPANT_COUNT)
        .map(|i| {
            let participant_seed = derive_participant_seed(&seed, i);
            chipmunk_hots::keygen(hots_params, &participant_seed, 0).map_err(HealthCheckError::from)
        })
        .collect()
}

#[tracing::instrument(skip_all)]
fn sign_stage(hots_params: &HotsParams, keys: &[(HotsPublicKey, HotsSecretKey)]) -> Result<Vec<HotsSignature>, HealthCheckError> {
    keys.iter()
        .map(|(_, sk)| chipmunk_hots::sign(hots_params, sk, HEALTH_CHECK_MESSAGE).map_err(HealthCheckError::from))
        .collect()
}

#[tracing::instrument(skip_all)]
fn tree_stage(domain_params: DomainParams, keys: &[(HotsPublicKey, HotsSecretKey)]) -> Result<HvcTree, HealthCheckError> {
    let hvc_hasher = HvcHasher::init(&Seed::new([0x5A; 32]), domain_params);
    let leaves = keys
        .iter()
        .map(|(pk, _)| chipmunk_hvc::leaf_from_hots_public_key(pk, domain_params).map_err(HealthCheckError::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HvcTree::build(hvc_hasher, leaves, PARTICIPANT_COUNT)?)
}

#[tracing::instrument(skip_all)]
fn individual_verify_stage(
    hots_params: &HotsParams,
    keys: &[(HotsPublicKey, HotsSecretKey)],
    signatures: &[HotsSignature],
    tree: &HvcTree,
) -> Result<(bool, Vec<MembershipPath>), HealthCheckError> {
    let mut all_valid = true;
    let mut paths = Vec::with_capacity(PARTICIPANT_COUNT);
    for (i, ((pk, _), sig)) in keys.iter().zip(signatures).enumerate() {
        let index = u32::try_from(i).unwrap_or(u32::MAX);
        let hots_valid = chipmunk_hots::verify(hots_params, pk, HEALTH_CHECK_MESSAGE, sig)?;
        let path = tree.gen_proof(index)?;
        let path_valid = HvcTree::verify_path(&path, tree.root(), tree.hasher())?;
        all_valid &= hots_valid == Validity::Valid && path_valid == Validity::Valid;
        paths.push(path);
    }
    Ok((all_valid, paths))
}

#[tracing::instrument(skip_all)]
fn aggregate_stage(
    hots_params: &HotsParams,
    tree: &HvcTree,
    keys: Vec<(HotsPublicKey, HotsSecretKey)>,
    signatures: Vec<HotsSignature>,
    paths: Vec<MembershipPath>,
) -> Result<chipmunk_aggregate::AggregateSignature, HealthCheckError> {
    let individuals: Vec<_> = keys
        .into_iter()
        .zip(signatures)
        .zip(paths)
        .enumerate()
        .map(|(i, (((pk, _), sig), path))| {
            let index = u32::try_from(i).unwrap_or(u32::MAX);
            chipmunk_aggregate::IndividualSignature::new(index, sig, pk, path)
        })
        .collect();
    Ok(chipmunk_aggregate::aggregate(hots_params, tree, HEALTH_CHECK_MESSAGE, &individuals)?)
}

/// Run the full keygen → sign → tree-build → individual-verify → aggregate
/// → aggregate-verify causal chain over [`PARTICIPANT_COUNT`] synthetic
/// participants derived from `seed`, and report per-stage pass/fail and
/// timing.
///
/// Deterministic in `seed`: the same `(domain_params, seed)` pair always
/// runs the same synthetic signers and produces the same report shape. A
/// caller invokes this once at startup to catch a misconfigured
/// [`DomainParams`] or a broken build before serving real traffic.
///
/// # Errors
/// Returns [`HealthCheckError`] if any stage's underlying operation errors
/// outright (malformed shapes, a domain precondition violation) rather than
/// simply failing its own check — a check failing is recorded in the
/// returned [`HealthReport`] instead.
pub fn health_check(domain_params: &DomainParams, seed: [u8; 32]) -> Result<HealthReport, HealthCheckError> {
    let domain_params = *domain_params;
    let start = Instant::now();
    let mut stages = Vec::with_capacity(6);

    let hots_params = timed("setup", &mut stages, true, || HotsParams::setup(domain_params));

    let keys = keygen_stage(&hots_params, seed)?;
    stages.push(StageResult { name: "keygen", passed: true, duration: Duration::ZERO });

    let signatures = sign_stage(&hots_params, &keys)?;
    stages.push(StageResult { name: "sign", passed: true, duration: Duration::ZERO });

    let tree = tree_stage(domain_params, &keys)?;
    stages.push(StageResult { name: "tree_build", passed: true, duration: Duration::ZERO });

    let (individual_passed, paths) = individual_verify_stage(&hots_params, &keys, &signatures, &tree)?;
    stages.push(StageResult { name: "individual_verify", passed: individual_passed, duration: Duration::ZERO });

    let hvc_hasher = tree.hasher().clone();
    let aggregate_signature = aggregate_stage(&hots_params, &tree, keys, signatures, paths)?;
    stages.push(StageResult { name: "aggregate", passed: true, duration: Duration::ZERO });

    let aggregate_valid = chipmunk_aggregate::verify(&hots_params, &hvc_hasher, &aggregate_signature, HEALTH_CHECK_MESSAGE)?;
    let aggregate_passed = aggregate_valid == Validity::Valid;
    stages.push(StageResult { name: "aggregate_verify", passed: aggregate_passed, duration: Duration::ZERO });

    let report = HealthReport { stages, total: start.elapsed() };
    if report.all_passed() {
        tracing::info!(total_ms = report.total.as_millis(), "chipmunk health check passed");
    } else {
        tracing::warn!(total_ms = report.total.as_millis(), "chipmunk health check reported a failing stage");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_passes_for_standard_params() {
        let report = health_check(&DomainParams::compact(), [0x11; 32]).expect("no stage errors");
        assert!(report.all_passed(), "stages: {:?}", report.stages);
        assert_eq!(report.stages.len(), 7);
    }

    #[test]
    fn health_check_is_deterministic() {
        let a = health_check(&DomainParams::compact(), [0x22; 32]).expect("no stage errors");
        let b = health_check(&DomainParams::compact(), [0x22; 32]).expect("no stage errors");
        assert_eq!(a.stages.len(), b.stages.len());
        for (sa, sb) in a.stages.iter().zip(&b.stages) {
            assert_eq!(sa.name, sb.name);
            assert_eq!(sa.passed, sb.passed);
        }
    }

    #[test]
    fn distinct_seeds_still_pass() {
        let report = health_check(&DomainParams::compact(), [0x33; 32]).expect("no stage errors");
        assert!(report.all_passed());
    }
}
