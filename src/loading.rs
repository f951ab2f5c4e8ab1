/// Raises a loading flag for as long as it lives.
///
/// The flag is lowered on drop, which also covers a request future that is
/// dropped mid-flight (timeouts, `select!`, the user moving on).
pub struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    pub fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test_log::test]
    fn should_clear_flag_when_dropped() {
        let mut loading = false;

        {
            let _loading = LoadingGuard::new(&mut loading);
        }

        assert!(!loading);
    }

    #[test_log::test(tokio::test)]
    async fn when_future_is_cancelled_should_clear_flag() {
        let mut loading = false;

        let pending = async {
            let _loading = LoadingGuard::new(&mut loading);
            std::future::pending::<()>().await;
        };

        assert!(tokio::time::timeout(Duration::from_millis(20), pending)
            .await
            .is_err());
        assert!(!loading);
    }
}
