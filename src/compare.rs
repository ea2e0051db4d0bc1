use std::cmp::Ordering;

/// A three-way comparison used to order the elements of a tree.
///
/// Implementations must define a strict total order. This is not checked:
/// an inconsistent comparison silently breaks the tree ordering.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Compare elements with their `Ord` implementation
#[derive(Debug, Default, Copy, Clone)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Build a three-way comparison out of a "less than" predicate.
/// Two elements are equal when neither is less than the other
#[derive(Debug, Default, Copy, Clone)]
pub struct ByLess<F>(pub F);

impl<T: ?Sized, F> Compare<T> for ByLess<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        if (self.0)(b, a) {
            Ordering::Greater
        } else if (self.0)(a, b) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert_eq!(Natural.compare("b", "a"), Ordering::Greater);
        assert_eq!(Natural.compare(&7, &7), Ordering::Equal);
    }

    #[test]
    fn closure() {
        let reversed = |a: &i32, b: &i32| b.cmp(a);
        assert_eq!(reversed.compare(&1, &2), Ordering::Greater);
        assert_eq!(reversed.compare(&2, &2), Ordering::Equal);
    }

    #[test]
    fn by_less() {
        // Only the lowest byte is significant
        let cmp = ByLess(|a: &u32, b: &u32| (a & 0xff) < (b & 0xff));
        assert_eq!(cmp.compare(&1, &2), Ordering::Less);
        assert_eq!(cmp.compare(&3, &2), Ordering::Greater);
        assert_eq!(cmp.compare(&0x105, &0x205), Ordering::Equal);
    }
}
