/// Candidate representation for the discovery engine
///
/// A genome is an ordered, fixed-length sequence of a caller-defined element
/// type. The engine never interprets the elements: it only recombines whole
/// columns between parents and hands genomes back to the host for scoring and
/// mutation. All genomes within one run must share the same length.
///
/// # Why a flat buffer?
///
/// Genetic operators work best on simple linear structures:
/// - **Crossover**: swapping column ranges is plain slicing
/// - **Mutation**: delegated entirely to the host, which sees a plain slice
/// - **No invalid states**: any column recombination of valid parents is a
///   structurally valid genome
pub type Genome<T> = Vec<T>;

/// One fitness value per objective, in the order declared by
/// `DiscoveryOptions::score_ascend_descend`. Never mutated once computed.
pub type ScoreVector = Vec<f64>;

/// A scored candidate. The score is computed the moment the genome is
/// produced and the pair is immutable from then on; items carried over
/// between generations are never rescored.
#[derive(Debug, Clone)]
pub struct SolutionItem<T> {
    pub genome: Genome<T>,
    pub score: ScoreVector,
}

impl<T> SolutionItem<T> {
    pub fn new(genome: Genome<T>, score: ScoreVector) -> Self {
        Self { genome, score }
    }
}
