// Reference index, keys are small non-negative integers used directly as
// slot offsets, so every answer can be computed by a linear scan.
struct RefNodes {
    entries: Vec<Option<i64>>,
}

impl RefNodes {
    fn new(capacity: usize) -> RefNodes {
        RefNodes {
            entries: vec![None; capacity],
        }
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    fn get(&self, key: i64) -> Option<i64> {
        self.entries[key as usize]
    }

    fn iter(&self) -> std::vec::IntoIter<(i64, i64)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(key, value)| value.map(|value| (key as i64, value)))
            .collect::<Vec<(i64, i64)>>()
            .into_iter()
    }

    fn set(&mut self, key: i64, value: i64) -> Option<i64> {
        self.entries[key as usize].replace(value)
    }

    fn update(&mut self, key: i64, value: i64) {
        let entry = &mut self.entries[key as usize];
        *entry = Some(entry.unwrap_or(0) + value);
    }

    fn delete(&mut self, key: i64) -> Option<i64> {
        self.entries[key as usize].take()
    }

    fn delete_min(&mut self) -> Option<(i64, i64)> {
        let item = self.iter().next();
        item.map(|(key, _)| (key, self.delete(key).unwrap()))
    }

    fn delete_max(&mut self) -> Option<(i64, i64)> {
        let item = self.iter().last();
        item.map(|(key, _)| (key, self.delete(key).unwrap()))
    }

    // number of keys strictly less than `key`.
    fn count_less(&self, key: i64) -> usize {
        self.iter().filter(|(k, _)| *k < key).count()
    }

    fn index_of(&self, key: i64) -> Option<usize> {
        self.get(key).map(|_| self.count_less(key))
    }

    fn index_of_less_or_equal(&self, key: i64) -> Option<usize> {
        self.iter().filter(|(k, _)| *k <= key).count().checked_sub(1)
    }

    fn index_of_greater_or_equal(&self, key: i64) -> usize {
        self.count_less(key)
    }

    fn ascend(&self, low: i64) -> Vec<(i64, i64)> {
        self.iter().filter(|(k, _)| *k >= low).collect()
    }

    fn descend(&self, high: i64) -> Vec<(i64, i64)> {
        let mut items: Vec<(i64, i64)> = self.iter().filter(|(k, _)| *k <= high).collect();
        items.reverse();
        items
    }
}

fn collect_ascend(llrb: &Llrb<i64, i64>, low: Limit<&i64>) -> Vec<(i64, i64)> {
    let mut items = vec![];
    llrb.ascend_greater_or_equal(low, |key, value| {
        items.push((*key, *value));
        true
    });
    items
}

fn collect_descend(llrb: &Llrb<i64, i64>, high: Limit<&i64>) -> Vec<(i64, i64)> {
    let mut items = vec![];
    llrb.descend_less_or_equal(high, |key, value| {
        items.push((*key, *value));
        true
    });
    items
}

fn check_iter(llrb: &Llrb<i64, i64>, refns: &RefNodes) {
    let (mut iter, mut iter_ref) = (llrb.iter(), refns.iter());
    loop {
        match (iter.next(), iter_ref.next()) {
            (Some(item), Some(ref_item)) => {
                assert_eq!(*item.0, ref_item.0);
                assert_eq!(*item.1, ref_item.1);
            }
            (None, None) => break,
            (item, ref_item) => panic!("invalid {:?} {:?}", item, ref_item),
        }
    }
}

fn height(llrb: &Llrb<i64, i64>) -> usize {
    llrb.validate().unwrap().depths().unwrap().max()
}
