pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Sort field bound to a digit key: `1` is the first column.
pub fn sort_field_for_digit(ch: char) -> Option<marketing_dashboard::SortField> {
    let digit = ch.to_digit(10)? as usize;
    marketing_dashboard::SortField::from_index(digit.checked_sub(1)?)
}
