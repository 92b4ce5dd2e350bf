//! Pacing configuration for the batch request scheduler

use std::time::Duration;

use crate::errors::ConfigError;

/// Settings for one run of the batch request scheduler
///
/// One outer chunk holds `concurrency_size × batch_size` inputs. Its
/// sub-batches (of `batch_size` items each) run concurrently, and the next
/// chunk does not start before `delays` has elapsed since this one started.
///
/// # Examples
///
/// ```rust
/// use ethopt::BatchConfig;
/// use std::time::Duration;
///
/// // Ten requests per second, at most five per sub-batch
/// let config = BatchConfig::from_rate_limit(10.0, 5, Duration::from_secs(1)).unwrap();
/// assert_eq!(config.batch_size, 5);
/// assert_eq!(config.concurrency_size, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of sub-batches executed in parallel within one outer chunk
    pub concurrency_size: usize,

    /// Number of items per sub-batch; a sub-batch is the retry unit
    pub batch_size: usize,

    /// Minimum wall-clock duration of one outer chunk
    pub delays: Duration,

    /// Additional attempts per sub-batch after the first failure
    pub retry_max: usize,

    /// Back-off before each retry attempt
    pub retry_on: Duration,

    /// Start offset between sub-batches of one chunk (multiplied by position)
    pub stagger: Duration,

    /// Scan ranges newest-first
    pub reverse: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency_size: 2,
            batch_size: 5,
            delays: Duration::from_millis(1000),
            retry_max: 2,
            retry_on: Duration::from_millis(500),
            stagger: Duration::from_millis(40),
            reverse: false,
        }
    }
}

impl BatchConfig {
    /// Sliding-window floor for [`BatchConfig::from_rate_limit`]
    pub const MIN_RATE_WINDOW: Duration = Duration::from_millis(1000);

    /// Start a builder from the defaults
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }

    /// Derive concurrency, batch size and chunk delay from a requests-per-second ceiling
    ///
    /// The window is `delays`, raised to at least one second. The number of
    /// requests allowed per window is `floor(rps × window)`; it is split into
    /// sub-batches of at most `max_batch_size` items. A rate too low to allow a
    /// single request per window stretches the window to `ceil(1000 / rps)` ms
    /// instead, so batch size and concurrency never drop below one.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidRate`] for a non-finite or non-positive rate, and
    /// [`ConfigError::ZeroSize`] for a zero `max_batch_size`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ethopt::BatchConfig;
    /// use std::time::Duration;
    ///
    /// let slow = BatchConfig::from_rate_limit(0.5, 10, Duration::from_secs(1)).unwrap();
    /// assert_eq!(slow.delays, Duration::from_secs(2));
    /// assert_eq!((slow.batch_size, slow.concurrency_size), (1, 1));
    /// ```
    pub fn from_rate_limit(
        requests_per_second: f64,
        max_batch_size: usize,
        delays: Duration,
    ) -> Result<Self, ConfigError> {
        if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            return Err(ConfigError::InvalidRate {
                rate: requests_per_second,
            });
        }
        if max_batch_size == 0 {
            return Err(ConfigError::zero_size("max_batch_size"));
        }

        let mut delays = delays.max(Self::MIN_RATE_WINDOW);
        let mut per_window = (requests_per_second * delays.as_secs_f64()).floor() as usize;
        if per_window == 0 {
            let stretched_ms = (1000.0 / requests_per_second).ceil() as u64;
            delays = delays.max(Duration::from_millis(stretched_ms));
            per_window = 1;
        }

        let batch_size = per_window.clamp(1, max_batch_size);
        let concurrency_size = (per_window / batch_size).max(1);

        Ok(Self {
            concurrency_size,
            batch_size,
            delays,
            ..Self::default()
        })
    }

    /// Number of inputs processed per outer chunk
    pub fn chunk_size(&self) -> usize {
        self.concurrency_size.saturating_mul(self.batch_size).max(1)
    }
}

/// Builder for [`BatchConfig`]
///
/// # Examples
///
/// ```rust
/// use ethopt::BatchConfig;
/// use std::time::Duration;
///
/// let config = BatchConfig::builder()
///     .concurrency_size(4)
///     .batch_size(10)
///     .retry_max(5)
///     .delays(Duration::ZERO)
///     .build()
///     .unwrap();
/// assert_eq!(config.chunk_size(), 40);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    /// Set the number of parallel sub-batches
    pub fn concurrency_size(mut self, size: usize) -> Self {
        self.config.concurrency_size = size;
        self
    }

    /// Set the sub-batch size
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the minimum duration of one outer chunk
    pub fn delays(mut self, delays: Duration) -> Self {
        self.config.delays = delays;
        self
    }

    /// Set the number of extra attempts per sub-batch
    pub fn retry_max(mut self, retry_max: usize) -> Self {
        self.config.retry_max = retry_max;
        self
    }

    /// Set the back-off before each retry
    pub fn retry_on(mut self, retry_on: Duration) -> Self {
        self.config.retry_on = retry_on;
        self
    }

    /// Set the sub-batch start offset
    pub fn stagger(mut self, stagger: Duration) -> Self {
        self.config.stagger = stagger;
        self
    }

    /// Scan newest-first
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.config.reverse = reverse;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroSize`] if the concurrency or batch size is zero.
    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        if self.config.concurrency_size == 0 {
            return Err(ConfigError::zero_size("concurrency_size"));
        }
        if self.config.batch_size == 0 {
            return Err(ConfigError::zero_size("batch_size"));
        }
        Ok(self.config)
    }
}
